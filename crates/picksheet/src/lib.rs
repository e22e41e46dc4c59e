//! Warehouse picking CLI tools.
//!
//! This crate provides command-line tools over the warehouse's spreadsheet
//! exports:
//!
//! - `picksheet-allocate`: Build a picking sheet for one or more order lines
//! - `picksheet-stock`: Inventory on hand, per-account totals, search
//! - `picksheet-movements`: Inbound/outbound movements by date, account, search
//!
//! Each source argument is either a CSV file path or an `http(s)://` URL.
//!
//! # Example Usage
//!
//! ```bash
//! picksheet-allocate inventario.csv A-100 6
//! picksheet-allocate inventario.csv --line A-100=6 --line B-7=2 --format csv -o sheet.csv
//! picksheet-stock https://example.com/inventario.csv --account Acme --totals
//! picksheet-movements salidas.csv --direction outbound --from 01/03/2024 --to 31/03/2024
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod export;
pub mod report;
