//! Worked picking examples.
//!
//! Each test is a small warehouse scenario with its expected picking sheet.
//! They double as regression tests when changing the allocation loop.

use picksheet_core::{
    allocate, AllocationPolicy, AllocationRequest, AllocationResult, Fulfillment, InventoryRow,
    InvalidRequestKind, NaiveDate, Snapshot,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Helpers
// ============================================================================

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// `[A/L1/X/5, A/L2/Y/3, B/10]`
fn two_lot_snapshot() -> Vec<InventoryRow> {
    vec![
        InventoryRow::new("A", dec!(5)).with_lot("L1").with_location("X"),
        InventoryRow::new("A", dec!(3)).with_lot("L2").with_location("Y"),
        InventoryRow::new("B", dec!(10)),
    ]
}

fn sheet(result: &AllocationResult) -> Vec<(&str, &str, Decimal)> {
    result
        .lines
        .iter()
        .map(|l| (l.lot.as_str(), l.location.as_str(), l.quantity_taken))
        .collect()
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn request_covered_across_two_lots() {
    let result = allocate(&two_lot_snapshot(), "A", dec!(6)).unwrap();

    assert_eq!(sheet(&result), vec![("L1", "X", dec!(5)), ("L2", "Y", dec!(1))]);
    assert_eq!(result.shortfall, dec!(0));
}

#[test]
fn request_larger_than_stock_reports_shortfall() {
    let result = allocate(&two_lot_snapshot(), "A", dec!(10)).unwrap();

    assert_eq!(sheet(&result), vec![("L1", "X", dec!(5)), ("L2", "Y", dec!(3))]);
    assert_eq!(result.shortfall, dec!(2));
    assert_eq!(result.fulfillment(), Fulfillment::Partial);
}

#[test]
fn unknown_sku_is_full_shortfall_not_error() {
    let result = allocate(&two_lot_snapshot(), "C", dec!(1)).unwrap();

    assert!(result.lines.is_empty());
    assert_eq!(result.shortfall, dec!(1));
    assert_eq!(result.fulfillment(), Fulfillment::Unavailable);
}

#[test]
fn zero_request_is_invalid() {
    let err = allocate(&two_lot_snapshot(), "A", dec!(0)).unwrap_err();
    assert_eq!(err.kind, InvalidRequestKind::NonPositiveQuantity(dec!(0)));
}

#[test]
fn row_without_lot_or_location_uses_placeholder() {
    let result = allocate(&two_lot_snapshot(), "B", dec!(4)).unwrap();
    assert_eq!(sheet(&result), vec![("N/A", "N/A", dec!(4))]);
}

// ============================================================================
// Multi-location ledgers
// ============================================================================

#[test]
fn same_lot_split_across_locations() {
    let rows = vec![
        InventoryRow::new("SKU-9", dec!(12)).with_lot("L7").with_location("A-01"),
        InventoryRow::new("SKU-9", dec!(0)).with_lot("L7").with_location("A-02"),
        InventoryRow::new("SKU-9", dec!(8)).with_lot("L7").with_location("B-03"),
        InventoryRow::new("SKU-9", dec!(30)).with_lot("L8").with_location("A-01"),
    ];

    let result = allocate(&rows, "SKU-9", dec!(25)).unwrap();

    assert_eq!(
        sheet(&result),
        vec![
            ("L7", "A-01", dec!(12)),
            ("L7", "B-03", dec!(8)),
            ("L8", "A-01", dec!(5)),
        ]
    );
    assert!(result.is_fulfilled());
}

#[test]
fn fractional_stock_is_exact() {
    let rows = vec![
        InventoryRow::new("RESIN", dec!(0.125)),
        InventoryRow::new("RESIN", dec!(0.375)),
        InventoryRow::new("RESIN", dec!(1.1)),
    ];

    let result = allocate(&rows, "RESIN", dec!(1.0)).unwrap();
    assert_eq!(result.lines[2].quantity_taken, dec!(0.5));
    assert_eq!(result.allocated() + result.shortfall, dec!(1.0));
}

// ============================================================================
// Receipt-date policy
// ============================================================================

/// Rows exported out of receipt order: the newer lot sits first in the table.
/// Row order keeps the table's priority; the receipt policy picks the older lot.
#[test]
fn receipt_policy_picks_older_lot_exported_second() {
    let snapshot = Snapshot::from_rows(vec![
        InventoryRow::new("AAPL-BOX", dec!(10))
            .with_lot("L-0102")
            .with_received(date(2024, 1, 2)),
        InventoryRow::new("AAPL-BOX", dec!(10))
            .with_lot("L-0101")
            .with_received(date(2024, 1, 1)),
    ]);
    let request = AllocationRequest::new("AAPL-BOX", dec!(5)).unwrap();

    let by_row = snapshot.allocate(&request);
    assert_eq!(by_row.lines[0].lot, "L-0102");

    let by_receipt = snapshot.allocate_with(&request, AllocationPolicy::OldestReceived);
    assert_eq!(by_receipt.lines[0].lot, "L-0101");
    assert_eq!(by_receipt.lines[0].row_index, 1);
}
