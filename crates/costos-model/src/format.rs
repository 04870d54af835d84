use std::fmt;

/// Closed set of spreadsheet layouts the detector can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DetectedFormat {
    /// Operational cost-list report: positional hierarchy, stateful parse.
    OperationalReport,
    /// Structured sheet literally named `COSTOS`, header-keyed records.
    CostosSheet,
    /// No known layout matched; yields zero rows, not an error.
    Unrecognized,
}

impl DetectedFormat {
    /// Stable tag persisted in source-file metadata and snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OperationalReport => "rptCostListResultOperation",
            Self::CostosSheet => "EstructuraAnterior:COSTOS",
            Self::Unrecognized => "NoReconocido",
        }
    }
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
