//! picksheet-stock - Inventory on hand by account.
//!
//! Lists the inventory table, optionally narrowed to one account and a
//! free-text search, with per-account totals.
//!
//! # Usage
//!
//! ```bash
//! picksheet-stock inventario.csv --totals
//! picksheet-stock inventario.csv --account Acme --query tornillo
//! picksheet-stock https://example.com/inventario.csv --format csv -o acme.csv
//! ```

use crate::cmd::completions::ShellType;
use crate::cmd::{
    init_tracing, load_inventory, open_output, FilterArgs, ImportArgs, OutputFormat,
};
use crate::{export, report};
use anyhow::Result;
use clap::Parser;
use picksheet_core::{AccountFilter, AccountTotals, InventoryRow};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Show inventory on hand, per-account totals, and search results.
#[derive(Parser, Debug)]
#[command(name = "picksheet-stock")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Inventory snapshot: CSV file path or http(s) URL
    #[arg(value_name = "SNAPSHOT", required_unless_present = "generate_completions")]
    pub snapshot: Option<String>,

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

/// JSON shape of the stock view.
#[derive(Debug, Serialize)]
pub struct StockView<'a> {
    /// Selected account (`Todas` for all).
    pub account: String,
    /// Active search text, lowercased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    /// Totals over the whole table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<AccountTotals>,
    /// Rows passing the filter.
    pub rows: Vec<&'a InventoryRow>,
}

/// Main entry point for the stock command.
pub fn main() -> ExitCode {
    main_with_name("picksheet-stock")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    // Handle shell completion generation
    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    let Some(snapshot) = args.snapshot.as_deref() else {
        eprintln!("error: SNAPSHOT is required");
        eprintln!("For more information, try '--help'");
        return ExitCode::from(2);
    };

    if let Err(e) = args.format.check_destination(args.output.as_deref()) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    init_tracing(args.verbose);

    match run(&args, snapshot) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args, source: &str) -> Result<()> {
    let snapshot = load_inventory(source, &args.import, false)?.into_snapshot();
    let filter = args.filter.row_filter();
    let view = StockView {
        account: filter.account.to_string(),
        query: filter.query(),
        totals: args.totals.then(|| AccountTotals::from_records(snapshot.rows())),
        rows: filter.apply(snapshot.rows()),
    };
    tracing::debug!(
        account = %filter.account,
        shown = view.rows.len(),
        total = snapshot.len(),
        "filtered inventory"
    );

    let mut out = open_output(args.output.as_deref())?;
    match args.format {
        OutputFormat::Text => write_text(&view, &filter.account, snapshot.len(), &mut out)?,
        OutputFormat::Json => export::write_json(&view, &mut out)?,
        OutputFormat::Csv => export::write_inventory_csv(&view.rows, &mut out)?,
        OutputFormat::Xlsx => export::Sheet::inventory(&view.rows).write_xlsx(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_text<W: Write>(
    view: &StockView<'_>,
    account: &AccountFilter,
    table_rows: usize,
    out: &mut W,
) -> io::Result<()> {
    if let Some(totals) = &view.totals {
        report::print_totals(totals, out)?;
        writeln!(out)?;
    }

    report::print_inventory(&view.rows, out)?;

    if !view.rows.is_empty() {
        let shown = view
            .rows
            .iter()
            .map(|r| r.quantity)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let scope = match account {
            AccountFilter::All => String::new(),
            AccountFilter::Only(account) => format!(" for {account}"),
        };
        writeln!(
            out,
            "\n{} of {table_rows} rows{scope}, {shown} units",
            view.rows.len()
        )?;
    }
    Ok(())
}
