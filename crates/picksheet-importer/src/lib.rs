//! Import framework for picksheet
//!
//! This crate reads the warehouse's spreadsheet exports (inventory on hand,
//! inbound and outbound movements) into [`picksheet_core`] rows.
//!
//! # Overview
//!
//! A [`Fetch`] source yields CSV text from a file or URL. An
//! [`ImporterConfig`] says which columns hold which fields. The importer
//! trims headers, coerces quantities and day-first dates, and keeps every
//! other column as a row attribute. Problems with individual rows become
//! warnings in the [`ImportResult`] rather than errors.
//!
//! # Example
//!
//! ```rust
//! use picksheet_importer::{extract_inventory_from_string, ImporterConfig};
//!
//! let config = ImporterConfig::csv()
//!     .sku_column("Producto")
//!     .quantity_column("Unidades")
//!     .build();
//!
//! let csv = "Producto,Unidades\nA,5\nB,oops\n";
//! let result = extract_inventory_from_string(csv, &config).unwrap();
//!
//! assert_eq!(result.records.len(), 2);
//! assert_eq!(result.warnings.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod csv_importer;
pub mod source;

use anyhow::{Context, Result};
use picksheet_core::{Direction, InventoryRow, MovementRow, Snapshot};

pub use config::{ColumnNames, ColumnSpec, ImporterConfig};
pub use csv_importer::{parse_day_first_date, parse_quantity, CsvImporter};
pub use source::{source_for, Fetch, FileSource, HttpSource};

/// Result of an import operation.
#[derive(Debug, Clone)]
pub struct ImportResult<T> {
    /// The extracted rows, in table order.
    pub records: Vec<T>,
    /// Warnings encountered during import.
    pub warnings: Vec<String>,
}

impl<T> ImportResult<T> {
    /// Create a new import result.
    pub const fn new(records: Vec<T>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

    /// Create an empty import result.
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a warning to the result.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Add a warning in place.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl ImportResult<InventoryRow> {
    /// Wrap the rows as a [`Snapshot`], dropping the warnings.
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::from_rows(self.records)
    }
}

/// Read inventory rows from CSV text (useful for testing).
pub fn extract_inventory_from_string(
    content: &str,
    config: &ImporterConfig,
) -> Result<ImportResult<InventoryRow>> {
    config.extract_inventory(content)
}

/// Read movement rows from CSV text.
pub fn extract_movements_from_string(
    content: &str,
    direction: Direction,
    config: &ImporterConfig,
) -> Result<ImportResult<MovementRow>> {
    config.extract_movements(content, direction)
}

/// Fetch and read an inventory snapshot.
pub fn load_snapshot(
    source: &dyn Fetch,
    config: &ImporterConfig,
) -> Result<ImportResult<InventoryRow>> {
    let content = source.fetch()?;
    config
        .extract_inventory(&content)
        .with_context(|| format!("Failed to read inventory from {}", source.name()))
}

/// Fetch and read a movement table.
pub fn load_movements(
    source: &dyn Fetch,
    direction: Direction,
    config: &ImporterConfig,
) -> Result<ImportResult<MovementRow>> {
    let content = source.fetch()?;
    config
        .extract_movements(&content, direction)
        .with_context(|| format!("Failed to read {direction} movements from {}", source.name()))
}

/// Like [`load_snapshot`], but an unreachable or unreadable source gives an
/// empty snapshot with a warning instead of an error.
pub fn load_snapshot_or_empty(
    source: &dyn Fetch,
    config: &ImporterConfig,
) -> ImportResult<InventoryRow> {
    load_snapshot(source, config).unwrap_or_else(|e| degraded(source, &e))
}

/// Like [`load_movements`], but degrades to an empty table.
pub fn load_movements_or_empty(
    source: &dyn Fetch,
    direction: Direction,
    config: &ImporterConfig,
) -> ImportResult<MovementRow> {
    load_movements(source, direction, config).unwrap_or_else(|e| degraded(source, &e))
}

fn degraded<T>(source: &dyn Fetch, error: &anyhow::Error) -> ImportResult<T> {
    tracing::warn!(source = source.name(), error = %format!("{error:#}"), "using empty table");
    ImportResult::empty().with_warning(format!(
        "{}: {error:#}; continuing with an empty table",
        source.name()
    ))
}
