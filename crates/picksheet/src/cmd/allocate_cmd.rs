//! picksheet-allocate - Build a picking sheet from an inventory snapshot.
//!
//! Each order line is allocated greedily against the snapshot. With several
//! lines, stock promised to an earlier line is not offered to a later one.
//!
//! # Usage
//!
//! ```bash
//! picksheet-allocate inventario.csv A-100 6
//! picksheet-allocate inventario.csv --line A-100=6 --line B-7=2 --policy oldest-received
//! picksheet-allocate https://example.com/inventario.csv A-100 6 --format csv -o sheet.csv
//! ```
//!
//! Exits with 1 when any line could not be fully covered.

use crate::cmd::completions::ShellType;
use crate::cmd::{
    init_tracing, load_inventory, open_output, use_color, ImportArgs, OutputFormat,
};
use crate::{export, report};
use anyhow::Result;
use clap::Parser;
use picksheet_core::{
    AllocationPolicy, AllocationRequest, AllocationResult, InvalidRequest, Snapshot,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Allocate inventory lots to order lines and print a picking sheet.
#[derive(Parser, Debug)]
#[command(name = "picksheet-allocate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Inventory snapshot: CSV file path or http(s) URL
    #[arg(value_name = "SNAPSHOT", required_unless_present = "generate_completions")]
    pub snapshot: Option<String>,

    /// SKU to pick
    #[arg(value_name = "SKU", requires = "quantity")]
    pub sku: Option<String>,

    /// Quantity to pick
    #[arg(value_name = "QTY", allow_hyphen_values = true)]
    pub quantity: Option<String>,

    /// Additional order line (can be specified multiple times)
    #[arg(short, long = "line", value_name = "SKU=QTY")]
    pub lines: Vec<String>,

    /// Which rows to take first: row-order or oldest-received
    #[arg(short, long, default_value = "row-order")]
    pub policy: AllocationPolicy,

    /// Output format (text, json, csv or xlsx)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the picking sheet to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Show verbose output including timing information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Every order line given on the command line, positional first.
    pub fn order_lines(&self) -> Result<Vec<AllocationRequest>, InvalidRequest> {
        let mut requests = Vec::with_capacity(self.lines.len() + 1);

        if let Some(sku) = &self.sku {
            let quantity = self.quantity.as_deref().unwrap_or_default();
            requests.push(AllocationRequest::parse(sku.trim(), quantity)?);
        }

        for line in &self.lines {
            let (sku, quantity) = line.split_once('=').unwrap_or((line.as_str(), ""));
            requests.push(AllocationRequest::parse(sku.trim(), quantity)?);
        }

        Ok(requests)
    }
}

/// Main entry point for the allocate command.
pub fn main() -> ExitCode {
    main_with_name("picksheet-allocate")
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

    let requests = match args.order_lines() {
        Ok(requests) if requests.is_empty() => {
            eprintln!("error: nothing to allocate; give SKU QTY or --line SKU=QTY");
            eprintln!("For more information, try '--help'");
            return ExitCode::from(2);
        }
        Ok(requests) => requests,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = args.format.check_destination(args.output.as_deref()) {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    init_tracing(args.verbose);

    match run(&args, snapshot, &requests) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args, source: &str, requests: &[AllocationRequest]) -> Result<ExitCode> {
    let loaded = load_inventory(source, &args.import, args.quiet)?;
    let warnings = loaded.warnings.len();
    let snapshot = loaded.into_snapshot();

    let results = plan(&snapshot, requests, args.policy);

    if !args.quiet || args.output.is_some() {
        let mut out = open_output(args.output.as_deref())?;
        match args.format {
            OutputFormat::Text => {
                let color = use_color(args.output.as_deref());
                write_text(&results, warnings, color, &mut out)?;
            }
            OutputFormat::Json => export::write_json(&results, &mut out)?,
            OutputFormat::Csv => export::write_picking_csv(&results, &mut out)?,
            OutputFormat::Xlsx => export::Sheet::picking(&results).write_xlsx(&mut out)?,
        }
        out.flush()?;
    }

    if results.iter().all(AllocationResult::is_fulfilled) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Allocate every order line against one snapshot.
pub fn plan(
    snapshot: &Snapshot,
    requests: &[AllocationRequest],
    policy: AllocationPolicy,
) -> Vec<AllocationResult> {
    let _span = tracing::info_span!("allocate", lines = requests.len(), %policy).entered();

    let mut planner = snapshot.planner().with_policy(policy);
    let results = planner.plan_all(requests);

    for result in &results {
        tracing::debug!(
            sku = %result.sku,
            requested = %result.requested,
            allocated = %result.allocated(),
            shortfall = %result.shortfall,
            "allocated order line"
        );
    }
    results
}

fn write_text<W: Write>(
    results: &[AllocationResult],
    warnings: usize,
    color: bool,
    out: &mut W,
) -> io::Result<()> {
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        report::print_allocation(result, color, out)?;
    }
    if results.len() > 1 {
        writeln!(out)?;
        report::print_order_summary(results, warnings, color, out)?;
    }
    Ok(())
}
