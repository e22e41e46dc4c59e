//! CSV table importer.

use crate::config::{ColumnSpec, ImporterConfig};
use crate::ImportResult;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use picksheet_core::{Direction, InventoryRow, MovementRow, MAX_QUANTITY};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Built-in date layouts, day-first. Two-digit years go before four-digit
/// ones so that `05/03/24` is not read as year 24.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d",
];

const TIME_SUFFIXES: &[&str] = &["", " %H:%M:%S", " %H:%M", "T%H:%M:%S"];

/// CSV table importer.
pub struct CsvImporter {
    config: ImporterConfig,
}

/// Header positions resolved against one table.
struct Columns {
    sku: usize,
    quantity: usize,
    lot: Option<usize>,
    location: Option<usize>,
    account: Option<usize>,
    date: Option<usize>,
    extra: Vec<(String, usize)>,
}

/// One row's values after coercion.
struct Fields {
    sku: String,
    quantity: Decimal,
    lot: Option<String>,
    location: Option<String>,
    account: Option<String>,
    date: Option<NaiveDate>,
    attributes: Vec<(String, String)>,
}

impl CsvImporter {
    /// Create a new CSV importer with the given configuration.
    pub const fn new(config: ImporterConfig) -> Self {
        Self { config }
    }

    /// Read an inventory table.
    pub fn extract_inventory(&self, content: &str) -> Result<ImportResult<InventoryRow>> {
        self.extract_with(content, |fields| InventoryRow {
            sku: fields.sku,
            lot: fields.lot,
            location: fields.location,
            quantity: fields.quantity,
            account: fields.account,
            received: fields.date,
            attributes: fields.attributes,
        })
    }

    /// Read an inbound or outbound movement table.
    pub fn extract_movements(
        &self,
        content: &str,
        direction: Direction,
    ) -> Result<ImportResult<MovementRow>> {
        self.extract_with(content, |fields| {
            let mut attributes = fields.attributes;
            // Movement rows have no dedicated lot/location fields
            if let Some(lot) = fields.lot {
                attributes.push(("Lote".to_string(), lot));
            }
            if let Some(location) = fields.location {
                attributes.push(("Ubicación".to_string(), location));
            }
            MovementRow {
                direction,
                date: fields.date,
                sku: fields.sku,
                quantity: fields.quantity,
                account: fields.account,
                attributes,
            }
        })
    }

    fn extract_with<T>(
        &self,
        content: &str,
        build: impl Fn(Fields) -> T,
    ) -> Result<ImportResult<T>> {
        let delimiter = u8::try_from(self.config.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| {
                format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    self.config.delimiter
                )
            })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read header row")?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let columns = self.resolve_columns(&headers)?;

        let mut result = ImportResult::empty();

        for (i, record) in reader.records().enumerate().skip(self.config.skip_rows) {
            let row_num = i + 1;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(row = row_num, error = %e, "skipping malformed record");
                    result.push_warning(format!("Row {row_num}: parse error: {e}"));
                    continue;
                }
            };

            if let Some(fields) = self.parse_row(&record, &columns, row_num, &mut result.warnings)
            {
                result.records.push(build(fields));
            }
        }

        tracing::debug!(
            rows = result.records.len(),
            warnings = result.warnings.len(),
            "parsed table"
        );
        Ok(result)
    }

    fn resolve_columns(&self, headers: &[String]) -> Result<Columns> {
        let names = &self.config.columns;
        let sku = find_column(&names.sku, headers)
            .with_context(|| format!("Required column {} not found in header", names.sku))?;
        let quantity = find_column(&names.quantity, headers).with_context(|| {
            format!("Required column {} not found in header", names.quantity)
        })?;

        let optional =
            |spec: &Option<ColumnSpec>| spec.as_ref().and_then(|spec| find_column(spec, headers));
        let lot = optional(&names.lot);
        let location = optional(&names.location);
        let account = optional(&names.account);
        let date = optional(&names.date);

        let used = [Some(sku), Some(quantity), lot, location, account, date];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(&Some(*i)))
            .map(|(i, h)| (h.clone(), i))
            .collect();

        Ok(Columns {
            sku,
            quantity,
            lot,
            location,
            account,
            date,
            extra,
        })
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        columns: &Columns,
        row_num: usize,
        warnings: &mut Vec<String>,
    ) -> Option<Fields> {
        let cell = |index: usize| record.get(index).unwrap_or("").trim();
        let text = |index: Option<usize>| {
            index.map(cell).filter(|s| !s.is_empty()).map(str::to_string)
        };

        let sku = cell(columns.sku);
        if sku.is_empty() {
            tracing::debug!(row = row_num, "skipping row without SKU");
            warnings.push(format!("Row {row_num}: empty SKU, skipped"));
            return None;
        }

        let raw_quantity = cell(columns.quantity);
        let quantity = match parse_quantity(raw_quantity) {
            Some(quantity) if quantity.abs() <= MAX_QUANTITY => quantity,
            Some(_) => {
                tracing::debug!(row = row_num, quantity = raw_quantity, "quantity out of range");
                warnings.push(format!(
                    "Row {row_num}: quantity '{raw_quantity}' exceeds {MAX_QUANTITY}, using 0"
                ));
                Decimal::ZERO
            }
            None => {
                warnings.push(format!(
                    "Row {row_num}: quantity '{raw_quantity}' is not a number, using 0"
                ));
                Decimal::ZERO
            }
        };

        let date = columns.date.map(cell).filter(|s| !s.is_empty()).and_then(|raw| {
            let parsed = if self.config.date_formats.is_empty() {
                parse_day_first_date(raw)
            } else {
                self.config
                    .date_formats
                    .iter()
                    .find_map(|format| parse_with_format(raw, format))
            };
            if parsed.is_none() {
                warnings.push(format!("Row {row_num}: unrecognized date '{raw}'"));
            }
            parsed
        });

        let attributes = columns
            .extra
            .iter()
            .map(|(name, i)| (name.clone(), cell(*i).to_string()))
            .collect();

        Some(Fields {
            sku: sku.to_string(),
            quantity,
            lot: text(columns.lot),
            location: text(columns.location),
            account: text(columns.account),
            date,
            attributes,
        })
    }
}

fn find_column(spec: &ColumnSpec, headers: &[String]) -> Option<usize> {
    match spec {
        ColumnSpec::Index(i) => (*i < headers.len()).then_some(*i),
        ColumnSpec::Name(name) => headers.iter().position(|h| h == name.trim()),
    }
}

/// Parse a quantity cell.
///
/// Blank cells are zero. Plain and scientific notation are accepted.
/// Returns `None` for anything else; callers treat that as zero.
pub fn parse_quantity(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Parse a date written day-first (`31/12/2024`, `31-12-24`, optionally
/// followed by a time) or in ISO form (`2024-12-31`).
pub fn parse_day_first_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DAY_FIRST_FORMATS.iter().find_map(|date| {
        TIME_SUFFIXES
            .iter()
            .find_map(|time| parse_with_format(s, &format!("{date}{time}")))
    })
}

fn parse_with_format(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, format).ok().or_else(|| {
        NaiveDateTime::parse_from_str(s, format)
            .ok()
            .map(|dt| dt.date())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("5"), Some(dec!(5)));
        assert_eq!(parse_quantity(" 2.50 "), Some(dec!(2.50)));
        assert_eq!(parse_quantity("-3"), Some(dec!(-3)));
        assert_eq!(parse_quantity("1e3"), Some(dec!(1000)));
        assert_eq!(parse_quantity(""), Some(Decimal::ZERO));
        assert_eq!(parse_quantity("   "), Some(Decimal::ZERO));
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("N/A"), None);
    }

    #[test]
    fn test_parse_day_first_date() {
        assert_eq!(parse_day_first_date("05/03/2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_day_first_date("05-03-2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_day_first_date("05/03/24"), Some(date(2024, 3, 5)));
        assert_eq!(parse_day_first_date("31/12/2024"), Some(date(2024, 12, 31)));
        assert_eq!(parse_day_first_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(
            parse_day_first_date("05/03/2024 14:30"),
            Some(date(2024, 3, 5))
        );
        assert_eq!(
            parse_day_first_date("2024-03-05T08:00:00"),
            Some(date(2024, 3, 5))
        );
    }

    #[test]
    fn test_parse_day_first_date_rejects() {
        assert_eq!(parse_day_first_date(""), None);
        assert_eq!(parse_day_first_date("31/13/2024"), None);
        assert_eq!(parse_day_first_date("yesterday"), None);
    }

    #[test]
    fn test_inventory_basic() {
        let config = ImporterConfig::default();
        let csv_content = "SKU,Lote,Ubicación,Cantidad,Cuenta\n\
                           A,L1,X,5,Acme\n\
                           A,L2,Y,3,Acme\n\
                           B,,,10,\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.records.len(), 3);

        let first = &result.records[0];
        assert_eq!(first.sku, "A");
        assert_eq!(first.lot.as_deref(), Some("L1"));
        assert_eq!(first.location.as_deref(), Some("X"));
        assert_eq!(first.quantity, dec!(5));
        assert_eq!(first.account.as_deref(), Some("Acme"));

        let last = &result.records[2];
        assert_eq!(last.lot, None);
        assert_eq!(last.location, None);
        assert_eq!(last.account, None);
    }

    #[test]
    fn test_headers_are_trimmed() {
        let config = ImporterConfig::default();
        let csv_content = " SKU , Cantidad \nA,4\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].quantity, dec!(4));
    }

    #[test]
    fn test_non_numeric_quantity_becomes_zero_with_warning() {
        let config = ImporterConfig::default();
        let csv_content = "SKU,Cantidad\nA,lots\nB,\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].quantity, Decimal::ZERO);
        assert_eq!(result.records[1].quantity, Decimal::ZERO);
        // Blank is silent, garbage is not
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("'lots'"));
    }

    #[test]
    fn test_out_of_range_quantity_becomes_zero_with_warning() {
        let config = ImporterConfig::default();
        let csv_content = "SKU,Cantidad,Cuenta\n\
                           A,50000000000000000000000000000,X\n\
                           A,50000000000000000000000000000,X\n\
                           B,-2e16,X\n\
                           C,1000000000000000,X\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(result.records.len(), 4);
        assert_eq!(result.records[0].quantity, Decimal::ZERO);
        assert_eq!(result.records[2].quantity, Decimal::ZERO);
        assert_eq!(result.records[3].quantity, MAX_QUANTITY);
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].starts_with("Row 1: quantity"));
        assert!(result.warnings[0].contains("exceeds"));

        let snapshot = result.into_snapshot();
        let totals = picksheet_core::AccountTotals::from_records(snapshot.rows());
        assert_eq!(totals.get("X"), Some(MAX_QUANTITY));
    }

    #[test]
    fn test_empty_sku_skipped() {
        let config = ImporterConfig::default();
        let csv_content = "SKU,Cantidad\n,4\nA,1\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.warnings, vec!["Row 1: empty SKU, skipped"]);
    }

    #[test]
    fn test_missing_required_column() {
        let config = ImporterConfig::default();
        let err = config.extract_inventory("SKU,Lote\nA,L1\n").unwrap_err();
        assert!(err.to_string().contains("'Cantidad'"));
    }

    #[test]
    fn test_extra_columns_become_attributes() {
        let config = ImporterConfig::default();
        let csv_content = "Descripción,SKU,Cantidad,Proveedor\nTornillo,A,4,Norte\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(
            result.records[0].attributes,
            vec![
                ("Descripción".to_string(), "Tornillo".to_string()),
                ("Proveedor".to_string(), "Norte".to_string()),
            ]
        );
    }

    #[test]
    fn test_received_date_and_bad_date_warning() {
        let config = ImporterConfig::default();
        let csv_content = "SKU,Cantidad,Fecha\nA,1,02/01/2024\nA,1,someday\nA,1,\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(result.records[0].received, Some(date(2024, 1, 2)));
        assert_eq!(result.records[1].received, None);
        assert_eq!(result.records[2].received, None);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Row 2:"));
    }

    #[test]
    fn test_custom_columns_and_delimiter() {
        let config = ImporterConfig::csv()
            .sku_column("Producto")
            .quantity_column_index(1)
            .delimiter(';')
            .date_format("%m/%d/%Y")
            .build();
        let csv_content = "Producto;Unidades;Fecha\nA;2,5;01/02/2024\n";

        let result = config.extract_inventory(csv_content).unwrap();
        let row = &result.records[0];
        assert_eq!(row.sku, "A");
        // Decimal commas are not numbers
        assert_eq!(row.quantity, Decimal::ZERO);
        assert_eq!(row.received, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_non_ascii_delimiter_is_error() {
        let config = ImporterConfig::csv().delimiter('¦').build();
        assert!(config.extract_inventory("SKU¦Cantidad\n").is_err());
    }

    #[test]
    fn test_skip_rows() {
        let config = ImporterConfig::csv().skip_rows(1).build();
        let csv_content = "SKU,Cantidad\nTOTAL,99\nA,1\n";

        let result = config.extract_inventory(csv_content).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].sku, "A");
    }

    #[test]
    fn test_movements() {
        let config = ImporterConfig::default();
        let csv_content = "Fecha,SKU,Cantidad,Cuenta,Lote\n15/01/2024,A,5,Acme,L1\n";

        let result = config
            .extract_movements(csv_content, Direction::Outbound)
            .unwrap();
        let row = &result.records[0];
        assert_eq!(row.direction, Direction::Outbound);
        assert_eq!(row.date, Some(date(2024, 1, 15)));
        assert_eq!(row.account.as_deref(), Some("Acme"));
        assert_eq!(
            row.attributes,
            vec![("Lote".to_string(), "L1".to_string())]
        );
    }
}
