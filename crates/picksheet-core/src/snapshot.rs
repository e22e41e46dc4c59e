//! Snapshot type representing an ordered inventory table.
//!
//! A [`Snapshot`] is the inventory table as exported at one point in time.
//! Row order is significant: it is the default picking priority.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::allocation::{allocate_request, allocate_with};
use crate::{AllocationPolicy, AllocationRequest, AllocationResult, InventoryRow, OrderPlanner};

/// An ordered collection of inventory rows.
///
/// # Examples
///
/// ```
/// use picksheet_core::{AllocationRequest, InventoryRow, Snapshot};
/// use rust_decimal_macros::dec;
///
/// let snapshot: Snapshot = vec![
///     InventoryRow::new("A", dec!(5)).with_lot("L1"),
///     InventoryRow::new("A", dec!(0)).with_lot("L0"),
///     InventoryRow::new("B", dec!(2)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(snapshot.on_hand("A"), dec!(5));
/// assert_eq!(snapshot.skus(), vec!["A", "B"]);
///
/// let result = snapshot.allocate(&AllocationRequest::new("A", dec!(2)).unwrap());
/// assert!(result.is_fulfilled());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    rows: Vec<InventoryRow>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing rows, keeping their order.
    #[must_use]
    pub const fn from_rows(rows: Vec<InventoryRow>) -> Self {
        Self { rows }
    }

    /// Get all rows.
    #[must_use]
    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    /// Take the rows back out.
    #[must_use]
    pub fn into_rows(self) -> Vec<InventoryRow> {
        self.rows
    }

    /// Append a row at the end.
    pub fn push(&mut self, row: InventoryRow) {
        self.rows.push(row);
    }

    /// Number of rows (including zero-quantity ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the snapshot has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total allocatable quantity of a SKU (rows above zero only).
    #[must_use]
    pub fn on_hand(&self, sku: &str) -> Decimal {
        self.rows
            .iter()
            .filter(|r| r.sku == sku && r.is_available())
            .map(|r| r.quantity)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Distinct SKUs, sorted.
    #[must_use]
    pub fn skus(&self) -> Vec<&str> {
        let mut skus: Vec<&str> = self.rows.iter().map(|r| r.sku.as_str()).collect();
        skus.sort_unstable();
        skus.dedup();
        skus
    }

    /// Allocate a request in row order.
    #[must_use]
    pub fn allocate(&self, request: &AllocationRequest) -> AllocationResult {
        allocate_request(&self.rows, request)
    }

    /// Allocate a request using the given policy.
    #[must_use]
    pub fn allocate_with(
        &self,
        request: &AllocationRequest,
        policy: AllocationPolicy,
    ) -> AllocationResult {
        allocate_with(&self.rows, request, policy)
    }

    /// Start planning a multi-line order against this snapshot.
    #[must_use]
    pub fn planner(&self) -> OrderPlanner<'_> {
        OrderPlanner::new(&self.rows)
    }
}

impl AsRef<[InventoryRow]> for Snapshot {
    fn as_ref(&self) -> &[InventoryRow] {
        &self.rows
    }
}

impl From<Vec<InventoryRow>> for Snapshot {
    fn from(rows: Vec<InventoryRow>) -> Self {
        Self::from_rows(rows)
    }
}

impl FromIterator<InventoryRow> for Snapshot {
    fn from_iter<I: IntoIterator<Item = InventoryRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a InventoryRow;
    type IntoIter = std::slice::Iter<'a, InventoryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }

        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}
