//! Multi-line order planning.
//!
//! An [`OrderPlanner`] allocates several requests against one snapshot,
//! remembering what earlier requests took so that two order lines are never
//! promised the same stock. The snapshot itself is only borrowed.

use rust_decimal::Decimal;

use crate::allocation::{allocate_candidates, Candidate};
use crate::{AllocationPolicy, AllocationRequest, AllocationResult, InventoryRow};

/// Plans a sequence of requests against a shared snapshot.
///
/// # Examples
///
/// ```
/// use picksheet_core::{AllocationRequest, InventoryRow, OrderPlanner};
/// use rust_decimal_macros::dec;
///
/// let rows = vec![
///     InventoryRow::new("A", dec!(5)).with_lot("L1"),
///     InventoryRow::new("A", dec!(3)).with_lot("L2"),
/// ];
///
/// let mut planner = OrderPlanner::new(&rows);
/// let first = planner.plan(&AllocationRequest::new("A", dec!(4)).unwrap());
/// let second = planner.plan(&AllocationRequest::new("A", dec!(4)).unwrap());
///
/// assert!(first.is_fulfilled());
/// assert!(second.is_fulfilled());
/// assert_eq!(second.lines[0].quantity_taken, dec!(1)); // rest of L1
/// assert_eq!(planner.remaining_on_hand("A"), dec!(0));
/// ```
#[derive(Debug, Clone)]
pub struct OrderPlanner<'a> {
    rows: &'a [InventoryRow],
    available: Vec<Decimal>,
    policy: AllocationPolicy,
}

impl<'a> OrderPlanner<'a> {
    /// Create a planner over `rows` using row order.
    #[must_use]
    pub fn new(rows: &'a [InventoryRow]) -> Self {
        Self {
            rows,
            available: rows.iter().map(|r| r.quantity).collect(),
            policy: AllocationPolicy::RowOrder,
        }
    }

    /// Use a different allocation policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The policy in use.
    #[must_use]
    pub const fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Allocate one request from whatever earlier requests left behind.
    pub fn plan(&mut self, request: &AllocationRequest) -> AllocationResult {
        let candidates = self
            .rows
            .iter()
            .zip(&self.available)
            .enumerate()
            .filter(|(_, (row, available))| {
                row.sku == request.sku() && **available > Decimal::ZERO
            })
            .map(|(index, (row, available))| Candidate {
                index,
                row,
                available: *available,
            });

        let result = allocate_candidates(request, self.policy, candidates);

        for line in &result.lines {
            self.available[line.row_index] -= line.quantity_taken;
        }

        result
    }

    /// Allocate every request in order.
    pub fn plan_all<'r>(
        &mut self,
        requests: impl IntoIterator<Item = &'r AllocationRequest>,
    ) -> Vec<AllocationResult> {
        requests.into_iter().map(|r| self.plan(r)).collect()
    }

    /// Quantity still unpromised in the row at `index`.
    #[must_use]
    pub fn available(&self, index: usize) -> Option<Decimal> {
        self.available.get(index).copied()
    }

    /// Unpromised quantity of `sku` across all rows that can still supply it.
    #[must_use]
    pub fn remaining_on_hand(&self, sku: &str) -> Decimal {
        self.rows
            .iter()
            .zip(&self.available)
            .filter(|(row, available)| row.sku == sku && **available > Decimal::ZERO)
            .map(|(_, available)| *available)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
