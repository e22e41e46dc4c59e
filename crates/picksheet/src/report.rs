//! Plain-text rendering of picking sheets and tables.

use chrono::NaiveDate;
use picksheet_core::{AccountTotals, AllocationResult, Fulfillment, InventoryRow, MovementRow};
use std::io::{self, Write};

/// Shown instead of an empty table.
pub const NO_DATA: &str = "No data to display.";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Write rows as a left-aligned table with a header line.
pub fn write_table<W: Write>(
    headers: &[&str],
    rows: &[Vec<String>],
    writer: &mut W,
) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(writer, "{NO_DATA}");
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    write_row(&header, &widths, writer)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&rule, &widths, writer)?;
    for row in rows {
        write_row(row, &widths, writer)?;
    }
    Ok(())
}

fn write_row<W: Write>(cells: &[String], widths: &[usize], writer: &mut W) -> io::Result<()> {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let pad = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(pad));
    }
    writeln!(writer, "{}", line.trim_end())
}

/// Outcome marker at the start of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    Warn,
    Fail,
}

impl Status {
    const fn glyph(self) -> char {
        match self {
            Self::Ok => '\u{2713}',
            Self::Warn => '\u{26A0}',
            Self::Fail => '\u{2717}',
        }
    }

    const fn ansi(self) -> &'static str {
        match self {
            Self::Ok => "\x1b[32m",
            Self::Warn => "\x1b[33m",
            Self::Fail => "\x1b[31m",
        }
    }

    /// The glyph, wrapped in ANSI colour codes when `color` is set.
    fn marker(self, color: bool) -> String {
        if color {
            format!("{}{}\x1b[0m", self.ansi(), self.glyph())
        } else {
            self.glyph().to_string()
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// Print one request's picking lines followed by its outcome.
///
/// `color` adds ANSI codes to the outcome marker; pass `false` for files
/// and pipes.
pub fn print_allocation<W: Write>(
    result: &AllocationResult,
    color: bool,
    writer: &mut W,
) -> io::Result<()> {
    writeln!(writer, "Picking {} x {}", result.sku, result.requested)?;

    let rows: Vec<Vec<String>> = result
        .lines
        .iter()
        .map(|line| {
            vec![
                line.lot.clone(),
                line.location.clone(),
                line.quantity_taken.to_string(),
            ]
        })
        .collect();
    if !rows.is_empty() {
        write_table(&["Lote", "Ubicación", "Cantidad"], &rows, writer)?;
    }

    match result.fulfillment() {
        Fulfillment::Complete => {
            let sources = result.lines.len();
            let noun = if sources == 1 { "location" } else { "locations" };
            writeln!(
                writer,
                "{} {} {} allocated from {sources} {noun}",
                Status::Ok.marker(color),
                result.requested,
                result.sku
            )?;
        }
        Fulfillment::Partial => {
            writeln!(
                writer,
                "{} Shortfall: {} {} not available ({} of {} allocated)",
                Status::Warn.marker(color),
                result.shortfall,
                result.sku,
                result.allocated(),
                result.requested
            )?;
        }
        Fulfillment::Unavailable => {
            writeln!(
                writer,
                "{} No stock for {} (shortfall {})",
                Status::Fail.marker(color),
                result.sku,
                result.shortfall
            )?;
        }
    }
    Ok(())
}

/// Print a one-line summary for a multi-line order.
pub fn print_order_summary<W: Write>(
    results: &[AllocationResult],
    warnings: usize,
    color: bool,
    writer: &mut W,
) -> io::Result<()> {
    let short = results.iter().filter(|r| !r.is_fulfilled()).count();
    let total = results.len();
    let line_text = if total == 1 { "line" } else { "lines" };
    let warning_text = if warnings == 1 { "warning" } else { "warnings" };

    if short == 0 && warnings == 0 {
        writeln!(
            writer,
            "{} All {total} order {line_text} covered",
            Status::Ok.marker(color)
        )
    } else if short > 0 {
        writeln!(
            writer,
            "{} {short} of {total} order {line_text} short",
            Status::Fail.marker(color)
        )
    } else {
        writeln!(
            writer,
            "{} All {total} order {line_text} covered, {warnings} {warning_text}",
            Status::Warn.marker(color)
        )
    }
}

/// Print inventory rows.
pub fn print_inventory<W: Write>(rows: &[&InventoryRow], writer: &mut W) -> io::Result<()> {
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.sku.clone(),
                row.lot_or_default().to_string(),
                row.location_or_default().to_string(),
                row.quantity.to_string(),
                row.account.clone().unwrap_or_default(),
                format_date(row.received),
            ]
        })
        .collect();
    write_table(
        &["SKU", "Lote", "Ubicación", "Cantidad", "Cuenta", "Fecha"],
        &table,
        writer,
    )
}

/// Print movement rows.
pub fn print_movements<W: Write>(rows: &[&MovementRow], writer: &mut W) -> io::Result<()> {
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                format_date(row.date),
                row.sku.clone(),
                row.quantity.to_string(),
                row.account.clone().unwrap_or_default(),
            ]
        })
        .collect();
    write_table(&["Fecha", "SKU", "Cantidad", "Cuenta"], &table, writer)
}

/// Print per-account totals with the grand total last.
pub fn print_totals<W: Write>(totals: &AccountTotals, writer: &mut W) -> io::Result<()> {
    let mut table: Vec<Vec<String>> = totals
        .accounts
        .iter()
        .map(|t| vec![t.account.clone(), t.quantity.to_string()])
        .collect();
    table.push(vec![
        picksheet_core::ALL_ACCOUNTS.to_string(),
        totals.grand_total.to_string(),
    ]);
    write_table(&["Cuenta", "Cantidad"], &table, writer)
}
