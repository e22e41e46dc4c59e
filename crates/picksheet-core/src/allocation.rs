//! The lot-allocation engine.
//!
//! Given an inventory snapshot and an [`AllocationRequest`], the allocator
//! walks the rows of the requested SKU and takes stock from each until the
//! request is covered or the rows run out. Whatever could not be covered is
//! returned as the result's shortfall; running short is not an error.
//!
//! The default [`AllocationPolicy::RowOrder`] takes rows in snapshot order.
//! That order is the picking priority, so rows are never re-sorted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AllocationRequest, InvalidRequest, InventoryRow};

/// Allocation policy determines the order in which candidate rows are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AllocationPolicy {
    /// Rows are used in snapshot order. No sorting of any kind.
    #[default]
    RowOrder,
    /// Rows are used oldest receipt date first.
    /// Undated rows come after dated ones; ties keep snapshot order.
    OldestReceived,
}

impl FromStr for AllocationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "ROW_ORDER" | "ROW" => Ok(Self::RowOrder),
            "OLDEST_RECEIVED" | "RECEIVED" => Ok(Self::OldestReceived),
            _ => Err(format!("unknown allocation policy: {s}")),
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOrder => write!(f, "ROW_ORDER"),
            Self::OldestReceived => write!(f, "OLDEST_RECEIVED"),
        }
    }
}

/// One picking instruction: take `quantity_taken` of `sku` from a lot at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationLine {
    /// Index of the source row in the snapshot.
    pub row_index: usize,
    /// The allocated SKU.
    pub sku: String,
    /// Source lot, or `N/A`.
    pub lot: String,
    /// Source location, or `N/A`.
    pub location: String,
    /// Quantity taken from the source row. Always positive.
    pub quantity_taken: Decimal,
}

impl AllocationLine {
    fn from_row(row_index: usize, row: &InventoryRow, quantity_taken: Decimal) -> Self {
        Self {
            row_index,
            sku: row.sku.clone(),
            lot: row.lot_or_default().to_string(),
            location: row.location_or_default().to_string(),
            quantity_taken,
        }
    }
}

impl fmt::Display for AllocationLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} from lot {} at {}",
            self.quantity_taken, self.sku, self.lot, self.location
        )
    }
}

/// How much of a request was covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Fulfillment {
    /// The whole request was covered.
    Complete,
    /// Some stock was found, but not enough.
    Partial,
    /// No stock was found for the SKU.
    Unavailable,
}

/// Result of allocating one request: the picking lines plus any shortfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    /// The requested SKU.
    pub sku: String,
    /// The requested quantity.
    pub requested: Decimal,
    /// Picking lines, in the order they should be picked.
    pub lines: Vec<AllocationLine>,
    /// Quantity that could not be covered. Never negative.
    pub shortfall: Decimal,
}

impl AllocationResult {
    /// Total quantity covered by the lines.
    #[must_use]
    pub fn allocated(&self) -> Decimal {
        self.lines.iter().map(|l| l.quantity_taken).sum()
    }

    /// Whether the request was covered in full.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.shortfall.is_zero()
    }

    /// Classify the outcome for messaging.
    #[must_use]
    pub fn fulfillment(&self) -> Fulfillment {
        if self.is_fulfilled() {
            Fulfillment::Complete
        } else if self.lines.is_empty() {
            Fulfillment::Unavailable
        } else {
            Fulfillment::Partial
        }
    }
}

/// Allocate `requested` units of `sku` from `rows` in row order.
///
/// Fails only when the request itself is malformed. An unknown SKU or an
/// empty snapshot yields no lines and a shortfall equal to `requested`.
///
/// # Examples
///
/// ```
/// use picksheet_core::{allocate, InventoryRow};
/// use rust_decimal_macros::dec;
///
/// let rows = vec![
///     InventoryRow::new("A", dec!(5)).with_lot("L1").with_location("X"),
///     InventoryRow::new("A", dec!(3)).with_lot("L2").with_location("Y"),
///     InventoryRow::new("B", dec!(10)),
/// ];
///
/// let result = allocate(&rows, "A", dec!(6)).unwrap();
/// assert_eq!(result.lines.len(), 2);
/// assert_eq!(result.lines[1].quantity_taken, dec!(1));
/// assert_eq!(result.shortfall, dec!(0));
///
/// let short = allocate(&rows, "A", dec!(10)).unwrap();
/// assert_eq!(short.shortfall, dec!(2));
///
/// assert!(allocate(&rows, "A", dec!(0)).is_err());
/// ```
pub fn allocate(
    rows: &[InventoryRow],
    sku: &str,
    requested: Decimal,
) -> Result<AllocationResult, InvalidRequest> {
    let request = AllocationRequest::new(sku, requested)?;
    Ok(allocate_request(rows, &request))
}

/// Allocate an already validated request in row order.
pub fn allocate_request(rows: &[InventoryRow], request: &AllocationRequest) -> AllocationResult {
    allocate_with(rows, request, AllocationPolicy::RowOrder)
}

/// Allocate an already validated request using the given policy.
pub fn allocate_with(
    rows: &[InventoryRow],
    request: &AllocationRequest,
    policy: AllocationPolicy,
) -> AllocationResult {
    let candidates = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.sku == request.sku() && row.is_available())
        .map(|(index, row)| Candidate {
            index,
            row,
            available: row.quantity,
        });

    allocate_candidates(request, policy, candidates)
}

/// A row eligible to supply a request, with the quantity it can still give.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub index: usize,
    pub row: &'a InventoryRow,
    pub available: Decimal,
}

/// Order candidates by policy, then take greedily.
pub(crate) fn allocate_candidates<'a>(
    request: &AllocationRequest,
    policy: AllocationPolicy,
    candidates: impl Iterator<Item = Candidate<'a>>,
) -> AllocationResult {
    match policy {
        AllocationPolicy::RowOrder => take_greedy(request, candidates),
        AllocationPolicy::OldestReceived => {
            let mut ordered: Vec<Candidate<'a>> = candidates.collect();
            // Stable sort: equal keys keep snapshot order.
            ordered.sort_by_key(|c| (c.row.received.is_none(), c.row.received));
            take_greedy(request, ordered.into_iter())
        }
    }
}

/// Take from each candidate in turn until the request is covered.
///
/// The loop exits as soon as nothing remains, so candidates after the one
/// that completes the request are never pulled from the iterator.
fn take_greedy<'a>(
    request: &AllocationRequest,
    candidates: impl Iterator<Item = Candidate<'a>>,
) -> AllocationResult {
    let mut remaining = request.quantity();
    let mut lines = Vec::new();

    for candidate in candidates {
        if candidate.available <= Decimal::ZERO {
            continue;
        }

        let taken = remaining.min(candidate.available);
        lines.push(AllocationLine::from_row(candidate.index, candidate.row, taken));
        remaining -= taken;

        if remaining.is_zero() {
            break;
        }
    }

    AllocationResult {
        sku: request.sku().to_string(),
        requested: request.quantity(),
        lines,
        shortfall: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvalidRequestKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn sample_rows() -> Vec<InventoryRow> {
        vec![
            InventoryRow::new("A", dec!(5)).with_lot("L1").with_location("X"),
            InventoryRow::new("A", dec!(3)).with_lot("L2").with_location("Y"),
            InventoryRow::new("B", dec!(10)),
        ]
    }

    fn picks(result: &AllocationResult) -> Vec<(&str, &str, Decimal)> {
        result
            .lines
            .iter()
            .map(|l| (l.lot.as_str(), l.location.as_str(), l.quantity_taken))
            .collect()
    }

    #[test]
    fn test_allocate_covered_by_two_rows() {
        let result = allocate(&sample_rows(), "A", dec!(6)).unwrap();

        assert_eq!(picks(&result), vec![("L1", "X", dec!(5)), ("L2", "Y", dec!(1))]);
        assert_eq!(result.shortfall, dec!(0));
        assert_eq!(result.fulfillment(), Fulfillment::Complete);
    }

    #[test]
    fn test_allocate_partial() {
        let result = allocate(&sample_rows(), "A", dec!(10)).unwrap();

        assert_eq!(picks(&result), vec![("L1", "X", dec!(5)), ("L2", "Y", dec!(3))]);
        assert_eq!(result.shortfall, dec!(2));
        assert_eq!(result.allocated(), dec!(8));
        assert_eq!(result.fulfillment(), Fulfillment::Partial);
    }

    #[test]
    fn test_allocate_unknown_sku() {
        let result = allocate(&sample_rows(), "C", dec!(1)).unwrap();

        assert!(result.lines.is_empty());
        assert_eq!(result.shortfall, dec!(1));
        assert_eq!(result.fulfillment(), Fulfillment::Unavailable);
    }

    #[test]
    fn test_allocate_zero_quantity_rejected() {
        let err = allocate(&sample_rows(), "A", dec!(0)).unwrap_err();
        assert_eq!(err.kind, InvalidRequestKind::NonPositiveQuantity(dec!(0)));
    }

    #[test]
    fn test_allocate_empty_snapshot() {
        let result = allocate(&[], "A", dec!(4)).unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(result.shortfall, dec!(4));
    }

    #[test]
    fn test_allocate_skips_zero_and_negative_rows() {
        let rows = vec![
            InventoryRow::new("A", dec!(0)).with_lot("EMPTY"),
            InventoryRow::new("A", dec!(-2)).with_lot("NEG"),
            InventoryRow::new("A", dec!(4)).with_lot("OK"),
        ];

        let result = allocate(&rows, "A", dec!(3)).unwrap();
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].lot, "OK");
        assert_eq!(result.lines[0].row_index, 2);
    }

    #[test]
    fn test_allocate_only_zero_rows_is_full_shortfall() {
        let rows = vec![InventoryRow::new("A", dec!(0))];
        let result = allocate(&rows, "A", dec!(2)).unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(result.shortfall, dec!(2));
    }

    #[test]
    fn test_allocate_sku_is_case_sensitive() {
        let rows = vec![InventoryRow::new("a", dec!(5))];
        let result = allocate(&rows, "A", dec!(1)).unwrap();
        assert!(result.lines.is_empty());
    }

    #[test]
    fn test_allocate_keeps_row_order_not_quantity_order() {
        let rows = vec![
            InventoryRow::new("A", dec!(1)).with_lot("SMALL"),
            InventoryRow::new("A", dec!(100)).with_lot("BIG"),
        ];

        let result = allocate(&rows, "A", dec!(2)).unwrap();
        let lots: Vec<&str> = result.lines.iter().map(|l| l.lot.as_str()).collect();
        assert_eq!(lots, vec!["SMALL", "BIG"]);
    }

    #[test]
    fn test_allocate_stops_at_satisfying_row() {
        let rows = vec![
            InventoryRow::new("A", dec!(5)).with_lot("L1"),
            InventoryRow::new("A", dec!(5)).with_lot("L2"),
            InventoryRow::new("A", dec!(5)).with_lot("L3"),
        ];

        let result = allocate(&rows, "A", dec!(5)).unwrap();
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].lot, "L1");
    }

    #[test]
    fn test_allocate_fractional_quantities_conserve() {
        let rows = vec![
            InventoryRow::new("A", dec!(0.1)),
            InventoryRow::new("A", dec!(0.2)),
        ];

        let result = allocate(&rows, "A", dec!(0.3)).unwrap();
        assert_eq!(result.allocated(), dec!(0.3));
        assert!(result.is_fulfilled());
    }

    #[test]
    fn test_oldest_received_policy() {
        let rows = vec![
            InventoryRow::new("A", dec!(5)).with_lot("UNDATED"),
            InventoryRow::new("A", dec!(5))
                .with_lot("NEWER")
                .with_received(date(2024, 3, 1)),
            InventoryRow::new("A", dec!(5))
                .with_lot("OLDER")
                .with_received(date(2024, 1, 1)),
        ];
        let request = AllocationRequest::new("A", dec!(12)).unwrap();

        let result = allocate_with(&rows, &request, AllocationPolicy::OldestReceived);
        let lots: Vec<&str> = result.lines.iter().map(|l| l.lot.as_str()).collect();
        assert_eq!(lots, vec!["OLDER", "NEWER", "UNDATED"]);
        assert_eq!(result.lines[2].quantity_taken, dec!(2));

        let by_row = allocate_with(&rows, &request, AllocationPolicy::RowOrder);
        let lots: Vec<&str> = by_row.lines.iter().map(|l| l.lot.as_str()).collect();
        assert_eq!(lots, vec!["UNDATED", "NEWER", "OLDER"]);
    }

    #[test]
    fn test_oldest_received_ties_keep_row_order() {
        let day = date(2024, 5, 5);
        let rows = vec![
            InventoryRow::new("A", dec!(1)).with_lot("FIRST").with_received(day),
            InventoryRow::new("A", dec!(1)).with_lot("SECOND").with_received(day),
        ];
        let request = AllocationRequest::new("A", dec!(2)).unwrap();

        let result = allocate_with(&rows, &request, AllocationPolicy::OldestReceived);
        assert_eq!(result.lines[0].lot, "FIRST");
        assert_eq!(result.lines[1].lot, "SECOND");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "row_order".parse::<AllocationPolicy>(),
            Ok(AllocationPolicy::RowOrder)
        );
        assert_eq!(
            "oldest-received".parse::<AllocationPolicy>(),
            Ok(AllocationPolicy::OldestReceived)
        );
        assert!("hifo".parse::<AllocationPolicy>().is_err());
        assert_eq!(AllocationPolicy::default().to_string(), "ROW_ORDER");
    }

    #[test]
    fn test_line_display() {
        let result = allocate(&sample_rows(), "B", dec!(2)).unwrap();
        assert_eq!(result.lines[0].to_string(), "2 B from lot N/A at N/A");
    }
}
