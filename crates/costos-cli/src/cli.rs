//! CLI argument definitions for the visor de costos.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "visor-costos",
    version,
    about = "Visor de costos hospitalarios - import, merge and summarize cost spreadsheets",
    long_about = "Import heterogeneous cost spreadsheets into a deduplicated local vault.\n\n\
                  Detects the layout of each file automatically (operational cost report or\n\
                  structured COSTOS sheet), merges rows on their composite identity, and\n\
                  renders filtered summaries as tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to the vault database.
    #[arg(
        long = "db",
        value_name = "PATH",
        default_value = "costos.db",
        global = true
    )]
    pub db: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import spreadsheet files and merge their rows into the vault.
    Import(ImportArgs),

    /// Show vault contents: row count, years, imported source files.
    Status,

    /// Render filtered cost summaries (totals, by month, by cost center).
    Resumen(ResumenArgs),

    /// Export the vault to a JSON snapshot.
    Export(ExportArgs),

    /// Import a JSON snapshot, merging its rows into the vault.
    ImportSnapshot(SnapshotArgs),

    /// Delete every row and source record from the vault.
    Clear(ClearArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Spreadsheet files to import (.xlsx, .xls).
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Parse and report only; do not merge the session into the vault.
    #[arg(long = "session-only")]
    pub session_only: bool,
}

#[derive(Parser)]
pub struct ResumenArgs {
    /// Restrict to these fiscal years (repeatable).
    #[arg(long = "vigencia", value_name = "YEAR")]
    pub vigencias: Vec<String>,

    /// Restrict to these months, lowercase Spanish names (repeatable).
    #[arg(long = "mes", value_name = "MONTH")]
    pub meses: Vec<String>,

    /// Restrict to these functional units (repeatable).
    #[arg(long = "uf", value_name = "UF")]
    pub ufs: Vec<String>,

    /// Free-text search over cost-center name and code
    /// (accent- and case-insensitive).
    #[arg(long = "buscar", value_name = "TEXT")]
    pub buscar: Option<String>,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Destination snapshot file.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct SnapshotArgs {
    /// Snapshot file to import.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct ClearArgs {
    /// Confirm the deletion.
    #[arg(long = "yes")]
    pub yes: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
