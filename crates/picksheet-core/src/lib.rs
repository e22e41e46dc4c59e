//! Core types for picksheet
//!
//! This crate provides the warehouse picking engine and the table types it
//! works on:
//!
//! - [`InventoryRow`] - A quantity of a SKU in one lot at one location
//! - [`Snapshot`] - An ordered inventory table
//! - [`AllocationRequest`] - A validated SKU + quantity demand
//! - [`allocate`] - Greedy, order-preserving lot allocation
//! - [`AllocationResult`] - Picking lines plus any shortfall
//! - [`OrderPlanner`] - Allocates several order lines against one snapshot
//! - [`MovementRow`] - Inbound/outbound movement records
//! - [`AccountTotals`] / [`RowFilter`] - Account grouping and row search
//!
//! Everything here is pure: no I/O, no shared state, no clocks.
//!
//! # Example
//!
//! ```
//! use picksheet_core::{allocate, InventoryRow};
//! use rust_decimal_macros::dec;
//!
//! let snapshot = vec![
//!     InventoryRow::new("A", dec!(5)).with_lot("L1").with_location("X"),
//!     InventoryRow::new("A", dec!(3)).with_lot("L2").with_location("Y"),
//!     InventoryRow::new("B", dec!(10)),
//! ];
//!
//! let result = allocate(&snapshot, "A", dec!(10)).unwrap();
//!
//! assert_eq!(result.lines.len(), 2);
//! assert_eq!(result.allocated(), dec!(8));
//! assert_eq!(result.shortfall, dec!(2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod allocation;
pub mod filter;
pub mod movement;
pub mod planner;
pub mod record;
pub mod request;
pub mod row;
pub mod snapshot;
pub mod summary;

pub use allocation::{
    allocate, allocate_request, allocate_with, AllocationLine, AllocationPolicy,
    AllocationResult, Fulfillment,
};
pub use filter::{AccountFilter, RowFilter, ALL_ACCOUNTS};
pub use movement::{DateRange, Direction, MovementRow};
pub use planner::OrderPlanner;
pub use record::Record;
pub use request::{AllocationRequest, InvalidRequest, InvalidRequestKind};
pub use row::{InventoryRow, MAX_QUANTITY, NOT_AVAILABLE};
pub use snapshot::Snapshot;
pub use summary::{AccountTotal, AccountTotals};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
