//! CSV, XLSX and JSON export of picking sheets and tables.
//!
//! Headers use the warehouse's own column names so an exported sheet
//! can be opened next to the source spreadsheets, or fed back to the
//! importer.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use picksheet_core::{AllocationResult, InventoryRow, MovementRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Columns of an exported picking sheet.
pub const PICKING_HEADERS: [&str; 4] = ["SKU", "Lote", "Ubicación", "Cantidad"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A table ready to be written out: headers and one string per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    /// Worksheet name used by the XLSX writer.
    pub name: &'static str,
    /// Header row.
    pub headers: Vec<String>,
    /// Data rows, each as long as `headers`.
    pub rows: Vec<Vec<String>>,
    /// Columns holding quantities, written as numbers in XLSX.
    numeric: Vec<usize>,
}

impl Sheet {
    fn new(name: &'static str, headers: Vec<String>, numeric: Vec<usize>) -> Self {
        Self {
            name,
            headers,
            rows: Vec::new(),
            numeric,
        }
    }

    /// Every picking line of every result.
    pub fn picking(results: &[AllocationResult]) -> Self {
        let headers = PICKING_HEADERS.iter().map(|h| (*h).to_string()).collect();
        let mut sheet = Self::new("Picking", headers, vec![3]);
        for line in results.iter().flat_map(|r| &r.lines) {
            sheet.rows.push(vec![
                line.sku.clone(),
                line.lot.clone(),
                line.location.clone(),
                line.quantity_taken.to_string(),
            ]);
        }
        sheet
    }

    /// Inventory rows, attributes after the fixed columns.
    pub fn inventory(rows: &[&InventoryRow]) -> Self {
        let extra = attribute_names(rows.iter().map(|r| &r.attributes));
        let mut headers: Vec<String> = ["SKU", "Lote", "Ubicación", "Cantidad", "Cuenta", "Fecha"]
            .iter()
            .map(|h| (*h).to_string())
            .collect();
        headers.extend(extra.iter().cloned());

        let mut sheet = Self::new("Inventario", headers, vec![3]);
        for row in rows {
            let mut record = vec![
                row.sku.clone(),
                row.lot.clone().unwrap_or_default(),
                row.location.clone().unwrap_or_default(),
                row.quantity.to_string(),
                row.account.clone().unwrap_or_default(),
                format_date(row.received),
            ];
            record.extend(attribute_values(&row.attributes, &extra));
            sheet.rows.push(record);
        }
        sheet
    }

    /// Movement rows, attributes after the fixed columns.
    pub fn movements(rows: &[&MovementRow]) -> Self {
        let extra = attribute_names(rows.iter().map(|r| &r.attributes));
        let mut headers: Vec<String> = ["Fecha", "SKU", "Cantidad", "Cuenta"]
            .iter()
            .map(|h| (*h).to_string())
            .collect();
        headers.extend(extra.iter().cloned());

        let mut sheet = Self::new("Movimientos", headers, vec![2]);
        for row in rows {
            let mut record = vec![
                format_date(row.date),
                row.sku.clone(),
                row.quantity.to_string(),
                row.account.clone().unwrap_or_default(),
            ];
            record.extend(attribute_values(&row.attributes, &extra));
            sheet.rows.push(record);
        }
        sheet
    }

    /// Write the sheet as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(&self.headers)?;
        for row in &self.rows {
            csv.write_record(row)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write the sheet as an XLSX workbook with a single worksheet.
    ///
    /// Quantity cells are stored as numbers, everything else as text.
    pub fn write_xlsx<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.name)?;

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, column(col)?, header, &bold)?;
        }

        for (i, row) in self.rows.iter().enumerate() {
            let row_num = u32::try_from(i + 1).context("Too many rows for a worksheet")?;
            for (col, cell) in row.iter().enumerate() {
                let col_num = column(col)?;
                match self.number_at(col, cell) {
                    Some(number) => worksheet.write_number(row_num, col_num, number)?,
                    None => worksheet.write_string(row_num, col_num, cell)?,
                };
            }
        }

        let bytes = workbook
            .save_to_buffer()
            .context("Failed to build XLSX workbook")?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn number_at(&self, col: usize, cell: &str) -> Option<f64> {
        if !self.numeric.contains(&col) {
            return None;
        }
        Decimal::from_str(cell).ok().and_then(|d| d.to_f64())
    }
}

fn column(index: usize) -> Result<u16> {
    u16::try_from(index).context("Too many columns for a worksheet")
}

/// Write every picking line of every result as CSV.
pub fn write_picking_csv<W: Write>(results: &[AllocationResult], writer: W) -> Result<()> {
    Sheet::picking(results).write_csv(writer)
}

/// Write inventory rows as CSV, attributes after the fixed columns.
pub fn write_inventory_csv<W: Write>(rows: &[&InventoryRow], writer: W) -> Result<()> {
    Sheet::inventory(rows).write_csv(writer)
}

/// Write movement rows as CSV, attributes after the fixed columns.
pub fn write_movements_csv<W: Write>(rows: &[&MovementRow], writer: W) -> Result<()> {
    Sheet::movements(rows).write_csv(writer)
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Attribute names in first-seen order.
fn attribute_names<'a>(rows: impl Iterator<Item = &'a Vec<(String, String)>>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for attributes in rows {
        for (name, _) in attributes {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

fn attribute_values<'a>(
    attributes: &'a [(String, String)],
    names: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    names.iter().map(|name| {
        attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    })
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}
