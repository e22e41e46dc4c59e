//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries. Arguments shared by
//! several commands live here.

pub mod allocate_cmd;
pub mod completions;
pub mod movements_cmd;
pub mod stock_cmd;

use anyhow::{Context, Result};
use clap::ValueEnum;
use picksheet_core::{
    AccountFilter, Direction, InventoryRow, MovementRow, RowFilter, ALL_ACCOUNTS,
};
use picksheet_importer::{
    load_movements, load_movements_or_empty, load_snapshot, load_snapshot_or_empty, source_for,
    ImportResult, ImporterConfig,
};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Output format for tables and picking sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling
    Json,
    /// CSV export
    Csv,
    /// Excel workbook (needs `--output`)
    Xlsx,
}

impl OutputFormat {
    /// Check that the format can go to the chosen destination.
    ///
    /// XLSX is binary and is only written to a file.
    pub fn check_destination(self, output: Option<&Path>) -> Result<(), String> {
        if self == Self::Xlsx && output.is_none() {
            return Err("--format xlsx needs --output FILE".to_string());
        }
        Ok(())
    }
}

/// Whether status markers should be coloured: only on an interactive stdout.
pub fn use_color(output: Option<&Path>) -> bool {
    output.is_none() && io::stdout().is_terminal()
}

/// How to read the source tables.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// JSON file describing the table's columns and delimiter
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV delimiter (overrides the config file)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Fail when a source cannot be read instead of using an empty table
    #[arg(long)]
    pub strict: bool,
}

impl ImportArgs {
    /// Resolve the importer configuration from the config file and flags.
    pub fn importer_config(&self) -> Result<ImporterConfig> {
        let mut config = match &self.config {
            Some(path) => ImporterConfig::from_json_file(path)?,
            None => ImporterConfig::default(),
        };
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        Ok(config)
    }
}

/// Account selection and search, as in the stock and movement views.
#[derive(clap::Args, Debug, Clone)]
pub struct FilterArgs {
    /// Show only this account's rows (`Todas` for every account)
    #[arg(short, long, default_value = ALL_ACCOUNTS)]
    pub account: AccountFilter,

    /// Case-insensitive text search across every column
    #[arg(short, long, value_name = "TEXT")]
    pub query: Option<String>,
}

impl FilterArgs {
    /// Build the row filter.
    pub fn row_filter(&self) -> RowFilter {
        let filter = RowFilter::new().with_account(self.account.clone());
        match &self.query {
            Some(query) => filter.with_query(query),
            None => filter,
        }
    }
}

/// Install the tracing subscriber.
///
/// Log output goes to stderr. `RUST_LOG` wins when set; otherwise the
/// level is `warn`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let span_events = if verbose {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .with_writer(io::stderr)
        .init();
}

/// Load the inventory snapshot named by `source`, printing any warnings.
pub fn load_inventory(
    source: &str,
    import: &ImportArgs,
    quiet: bool,
) -> Result<ImportResult<InventoryRow>> {
    let config = import.importer_config()?;
    let source = source_for(source);

    let result = if import.strict {
        load_snapshot(source.as_ref(), &config)?
    } else {
        load_snapshot_or_empty(source.as_ref(), &config)
    };
    tracing::info!(
        source = source.name(),
        rows = result.records.len(),
        "loaded inventory"
    );

    print_warnings(&result, quiet);
    Ok(result)
}

/// Load a movement table named by `source`, printing any warnings.
pub fn load_movement_table(
    source: &str,
    direction: Direction,
    import: &ImportArgs,
    quiet: bool,
) -> Result<ImportResult<MovementRow>> {
    let config = import.importer_config()?;
    let source = source_for(source);

    let result = if import.strict {
        load_movements(source.as_ref(), direction, &config)?
    } else {
        load_movements_or_empty(source.as_ref(), direction, &config)
    };
    tracing::info!(
        source = source.name(),
        %direction,
        rows = result.records.len(),
        "loaded movements"
    );

    print_warnings(&result, quiet);
    Ok(result)
}

fn print_warnings<T>(result: &ImportResult<T>, quiet: bool) {
    if quiet {
        return;
    }
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
}

/// Open the output destination: a file when given, stdout otherwise.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
