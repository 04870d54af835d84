use std::collections::BTreeSet;

use crate::row::CostRow;

/// Metadata recorded once per imported source file.
///
/// Purely informational: never mutated after creation and never consulted
/// during identity resolution. Field names match the snapshot document
/// produced by the original export format.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceFile {
    /// Generated unique token; backfilled on snapshot import when absent.
    #[serde(default)]
    pub id: String,
    pub filename: String,
    /// Tag of the parser that matched (see `DetectedFormat::as_str`).
    #[serde(rename = "detectedType")]
    pub detected_type: String,
    /// ISO-8601 creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Number of rows the file contributed.
    #[serde(default)]
    pub rows: u64,
    /// Sorted set of fiscal years the file touched.
    #[serde(default)]
    pub years: Vec<String>,
}

impl SourceFile {
    /// Build the metadata record for a batch of rows from one file.
    pub fn for_batch(filename: &str, detected_type: &str, rows: &[CostRow]) -> Self {
        let years: BTreeSet<String> = rows
            .iter()
            .filter(|r| !r.vigencia.is_empty())
            .map(|r| r.vigencia.clone())
            .collect();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            detected_type: detected_type.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            rows: rows.len() as u64,
            years: years.into_iter().collect(),
        }
    }

    /// Assign a generated id if the record does not carry one.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
    }
}
