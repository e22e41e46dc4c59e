//! Configuration for importers.

use crate::csv_importer::CsvImporter;
use crate::ImportResult;
use anyhow::{Context, Result};
use picksheet_core::{Direction, InventoryRow, MovementRow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for reading an inventory or movement table.
///
/// Can be built in code with [`ImporterConfig::csv`] or loaded from a JSON
/// file. Keys missing from the JSON fall back to the defaults.
///
/// ```json
/// { "delimiter": ";", "columns": { "sku": "Producto", "lot": null } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Where each field is found in the table.
    pub columns: ColumnNames,
    /// The field delimiter.
    pub delimiter: char,
    /// Number of data rows to skip after the header.
    pub skip_rows: usize,
    /// Date formats (strftime-style) to try, in order. Empty means the
    /// built-in day-first list.
    pub date_formats: Vec<String>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            delimiter: ',',
            skip_rows: 0,
            date_formats: Vec::new(),
        }
    }
}

/// Column locations for every field the importer understands.
///
/// `sku` and `quantity` are required. The rest are optional: `None`
/// disables the field, and a named column missing from the header is
/// simply treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// SKU column.
    pub sku: ColumnSpec,
    /// Quantity column.
    pub quantity: ColumnSpec,
    /// Lot column.
    pub lot: Option<ColumnSpec>,
    /// Location column.
    pub location: Option<ColumnSpec>,
    /// Account column.
    pub account: Option<ColumnSpec>,
    /// Date column (receipt date for inventory, movement date otherwise).
    pub date: Option<ColumnSpec>,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            sku: ColumnSpec::name("SKU"),
            quantity: ColumnSpec::name("Cantidad"),
            lot: Some(ColumnSpec::name("Lote")),
            location: Some(ColumnSpec::name("Ubicación")),
            account: Some(ColumnSpec::name("Cuenta")),
            date: Some(ColumnSpec::name("Fecha")),
        }
    }
}

/// Specification for a column in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    /// Column specified by name (from header, after trimming).
    Name(String),
    /// Column specified by zero-based index.
    Index(usize),
}

impl ColumnSpec {
    /// Column by header name.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl std::fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Index(i) => write!(f, "#{i}"),
        }
    }
}

impl ImporterConfig {
    /// Start building a CSV importer configuration.
    pub fn csv() -> CsvConfigBuilder {
        CsvConfigBuilder::new()
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid importer configuration")
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Read inventory rows from CSV text.
    pub fn extract_inventory(&self, content: &str) -> Result<ImportResult<InventoryRow>> {
        CsvImporter::new(self.clone()).extract_inventory(content)
    }

    /// Read movement rows from CSV text.
    pub fn extract_movements(
        &self,
        content: &str,
        direction: Direction,
    ) -> Result<ImportResult<MovementRow>> {
        CsvImporter::new(self.clone()).extract_movements(content, direction)
    }
}

/// Builder for CSV importer configuration.
pub struct CsvConfigBuilder {
    config: ImporterConfig,
}

impl CsvConfigBuilder {
    /// Create a new CSV config builder with the default columns.
    pub fn new() -> Self {
        Self {
            config: ImporterConfig::default(),
        }
    }

    /// Set the SKU column by name.
    pub fn sku_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.sku = ColumnSpec::Name(name.into());
        self
    }

    /// Set the SKU column by index.
    pub fn sku_column_index(mut self, index: usize) -> Self {
        self.config.columns.sku = ColumnSpec::Index(index);
        self
    }

    /// Set the quantity column by name.
    pub fn quantity_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.quantity = ColumnSpec::Name(name.into());
        self
    }

    /// Set the quantity column by index.
    pub fn quantity_column_index(mut self, index: usize) -> Self {
        self.config.columns.quantity = ColumnSpec::Index(index);
        self
    }

    /// Set the lot column by name.
    pub fn lot_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.lot = Some(ColumnSpec::Name(name.into()));
        self
    }

    /// Set the location column by name.
    pub fn location_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.location = Some(ColumnSpec::Name(name.into()));
        self
    }

    /// Set the account column by name.
    pub fn account_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.account = Some(ColumnSpec::Name(name.into()));
        self
    }

    /// Set the date column by name.
    pub fn date_column(mut self, name: impl Into<String>) -> Self {
        self.config.columns.date = Some(ColumnSpec::Name(name.into()));
        self
    }

    /// Ignore dates entirely.
    pub fn no_date_column(mut self) -> Self {
        self.config.columns.date = None;
        self
    }

    /// Add a date format to try (replaces the built-in list on first use).
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_formats.push(format.into());
        self
    }

    /// Set the field delimiter.
    pub const fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the number of rows to skip.
    pub const fn skip_rows(mut self, count: usize) -> Self {
        self.config.skip_rows = count;
        self
    }

    /// Build the importer configuration.
    pub fn build(self) -> ImporterConfig {
        self.config
    }
}

impl Default for CsvConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
