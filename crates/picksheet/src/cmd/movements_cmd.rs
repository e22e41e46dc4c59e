//! picksheet-movements - Inbound and outbound stock movements.
//!
//! Lists the inbound (`Entradas`) or outbound (`Salidas`) table, narrowed by
//! date range, account, and free-text search.
//!
//! # Usage
//!
//! ```bash
//! picksheet-movements entradas.csv
//! picksheet-movements salidas.csv --direction outbound --from 01/03/2024 --to 31/03/2024
//! picksheet-movements salidas.csv -d out --account Acme --totals --format json
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{
    init_tracing, load_movement_table, open_output, FilterArgs, ImportArgs, OutputFormat,
};
use crate::{export, report};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use picksheet_core::{AccountTotals, DateRange, Direction, MovementRow, RowFilter};
use picksheet_importer::parse_day_first_date;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Show inbound or outbound movements by date, account, and search text.
#[derive(Parser, Debug)]
#[command(name = "picksheet-movements")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Movement table: CSV file path or http(s) URL
    #[arg(value_name = "SOURCE", required_unless_present = "generate_completions")]
    pub source: Option<String>,

    /// Which table this is: inbound (entradas) or outbound (salidas)
    #[arg(short, long, default_value = "inbound")]
    pub direction: Direction,

    /// First day to include (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day to include (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Show per-account totals before the rows
    #[arg(short, long)]
    pub totals: bool,

    /// Output format (text, json, csv or xlsx)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the table to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The requested date range.
    pub const fn date_range(&self) -> DateRange {
        DateRange {
            start: self.from,
            end: self.to,
        }
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_day_first_date(s).ok_or_else(|| format!("invalid date: {s}"))
}

/// JSON shape of the movements view.
#[derive(Debug, Serialize)]
pub struct MovementView<'a> {
    /// Inbound or outbound.
    pub direction: Direction,
    /// Date filter.
    pub range: DateRange,
    /// Selected account (`Todas` for all).
    pub account: String,
    /// Active search text, lowercased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    /// Totals over the rows in the date range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<AccountTotals>,
    /// Rows passing every filter.
    pub rows: Vec<&'a MovementRow>,
}

/// Apply the date range, then the account and search filter.
pub fn select<'a>(
    rows: &'a [MovementRow],
    range: &DateRange,
    filter: &RowFilter,
) -> Vec<&'a MovementRow> {
    range
        .filter(rows)
        .into_iter()
        .filter(|row| filter.matches(*row))
        .collect()
}

/// Main entry point for the movements command.
pub fn main() -> ExitCode {
    main_with_name("picksheet-movements")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    let Some(source) = args.source.as_deref() else {
        eprintln!("error: SOURCE is required");
        eprintln!("For more information, try '--help'");
        return ExitCode::from(2);
    };

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            eprintln!("error: --from {from} is after --to {to}");
            return ExitCode::from(2);
        }
    }

    if let Err(e) = args.format.check_destination(args.output.as_deref()) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    init_tracing(args.verbose);

    match run(&args, source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args, source: &str) -> Result<()> {
    let table = load_movement_table(source, args.direction, &args.import, false)?.records;
    let range = args.date_range();
    let filter = args.filter.row_filter();

    let in_range = range.filter(&table);
    let view = MovementView {
        direction: args.direction,
        range,
        account: filter.account.to_string(),
        query: filter.query(),
        totals: args
            .totals
            .then(|| AccountTotals::from_records(in_range.iter().copied())),
        rows: select(&table, &range, &filter),
    };
    tracing::debug!(
        direction = %args.direction,
        in_range = in_range.len(),
        shown = view.rows.len(),
        "filtered movements"
    );

    let mut out = open_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Text => write_text(&view, &mut out)?,
        OutputFormat::Json => export::write_json(&view, &mut out)?,
        OutputFormat::Csv => export::write_movements_csv(&view.rows, &mut out)?,
        OutputFormat::Xlsx => export::Sheet::movements(&view.rows).write_xlsx(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_text<W: Write>(view: &MovementView<'_>, out: &mut W) -> io::Result<()> {
    if let Some(totals) = &view.totals {
        report::print_totals(totals, out)?;
        writeln!(out)?;
    }

    report::print_movements(&view.rows, out)?;

    if !view.rows.is_empty() {
        let units = view
            .rows
            .iter()
            .map(|r| r.quantity)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let noun = if view.rows.len() == 1 {
            "movement"
        } else {
            "movements"
        };
        writeln!(
            out,
            "\n{} {} {noun}, {units} units",
            view.rows.len(),
            view.direction
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use picksheet_core::AccountFilter;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> Vec<MovementRow> {
        vec![
            MovementRow::new(Direction::Outbound, "A", dec!(2))
                .with_date(date(2024, 2, 28))
                .with_account("Acme"),
            MovementRow::new(Direction::Outbound, "A", dec!(5))
                .with_date(date(2024, 3, 5))
                .with_account("Acme"),
            MovementRow::new(Direction::Outbound, "B", dec!(1))
                .with_date(date(2024, 3, 9))
                .with_account("Globex"),
            MovementRow::new(Direction::Outbound, "B", dec!(4)).with_account("Globex"),
        ]
    }

    #[test]
    fn test_args_dates_day_first() {
        let args = Args::parse_from([
            "picksheet-movements",
            "salidas.csv",
            "-d",
            "salidas",
            "--from",
            "01/03/2024",
            "--to",
            "2024-03-31",
        ]);
        assert_eq!(args.direction, Direction::Outbound);
        assert_eq!(args.from, Some(date(2024, 3, 1)));
        assert_eq!(args.to, Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_args_bad_date_rejected() {
        let parsed = Args::try_parse_from(["picksheet-movements", "x.csv", "--from", "soon"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_args_default_direction() {
        let args = Args::parse_from(["picksheet-movements", "entradas.csv"]);
        assert_eq!(args.direction, Direction::Inbound);
        assert!(args.date_range().is_unbounded());
    }

    #[test]
    fn test_select_by_range_and_account() {
        let table = table();
        let range = DateRange::between(date(2024, 3, 1), date(2024, 3, 31));
        let filter = RowFilter::new().with_account(AccountFilter::Only("Acme".to_string()));

        let rows = select(&table, &range, &filter);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, dec!(5));
    }

    #[test]
    fn test_select_unbounded_keeps_undated() {
        let table = table();
        let filter = RowFilter::new().with_query("b");

        let rows = select(&table, &DateRange::unbounded(), &filter);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_write_text_summary() {
        let table = table();
        let view = MovementView {
            direction: Direction::Outbound,
            range: DateRange::unbounded(),
            account: "Todas".to_string(),
            query: None,
            totals: Some(AccountTotals::from_records(&table)),
            rows: table.iter().collect(),
        };

        let mut out = Vec::new();
        write_text(&view, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Acme    7"));
        assert!(text.contains("Globex  5"));
        assert!(text.contains("28/02/2024"));
        assert!(text.contains("4 outbound movements, 12 units"));
    }
}
