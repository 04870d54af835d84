//! Result types handed from command handlers to the summary printer.

use costos_ingest::FileOutcome;
use costos_model::SourceFile;
use costos_report::{CentroSummary, MonthSummary, SosStats, Totals};
use costos_store::MergeOutcome;

pub struct ImportResult {
    pub files: Vec<FileOutcome>,
    pub session_rows: usize,
    /// `None` when the session was not promoted into the vault.
    pub merge: Option<MergeOutcome>,
    pub vault_rows: Option<usize>,
}

pub struct StatusResult {
    pub rows: usize,
    pub years: Vec<String>,
    /// Newest first.
    pub sources: Vec<SourceFile>,
}

pub struct ResumenResult {
    pub matched_rows: usize,
    pub totals: Totals,
    pub months: Vec<MonthSummary>,
    pub centros: Vec<CentroSummary>,
    pub sos: Option<SosStats>,
}
