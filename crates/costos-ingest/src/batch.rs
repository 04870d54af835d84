//! Best-effort multi-file loading into a session batch.

use std::path::{Path, PathBuf};

use costos_model::{CostRow, DetectedFormat};

use crate::detect::detect_and_parse;

/// Fallback display name for files whose name cannot be read.
const UNNAMED_FILE: &str = "Archivo";

/// Per-file result of a batch load.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub filename: String,
    /// `None` when the file could not be opened or read at all.
    pub format: Option<DetectedFormat>,
    pub rows: usize,
    pub error: Option<String>,
}

/// Rows from the most recent import, tagged with their originating
/// filename but not yet committed to durable storage.
#[derive(Debug, Default)]
pub struct SessionBatch {
    pub rows: Vec<CostRow>,
    pub files: Vec<FileOutcome>,
}

impl SessionBatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse every file, accumulating whatever rows can be produced.
///
/// A file that fails to open, or matches no known layout, contributes
/// zero rows and is recorded in the outcome list; it never aborts the
/// rest of the batch.
pub fn load_files(paths: &[PathBuf]) -> SessionBatch {
    let mut batch = SessionBatch::default();
    for path in paths {
        let filename = display_name(path);
        match detect_and_parse(path) {
            Ok(parsed) => {
                if parsed.format == DetectedFormat::Unrecognized {
                    tracing::warn!(file = %filename, "unrecognized layout, no rows loaded");
                } else {
                    tracing::info!(
                        file = %filename,
                        format = %parsed.format,
                        rows = parsed.rows.len(),
                        "file loaded into session"
                    );
                }
                batch.files.push(FileOutcome {
                    filename: filename.clone(),
                    format: Some(parsed.format),
                    rows: parsed.rows.len(),
                    error: None,
                });
                for mut row in parsed.rows {
                    row.source = Some(filename.clone());
                    batch.rows.push(row);
                }
            }
            Err(error) => {
                tracing::warn!(file = %filename, %error, "file skipped, continuing with batch");
                batch.files.push(FileOutcome {
                    filename,
                    format: None,
                    rows: 0,
                    error: Some(error.to_string()),
                });
            }
        }
    }
    batch
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(UNNAMED_FILE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_files_do_not_abort_the_batch() {
        let batch = load_files(&[PathBuf::from("/nonexistent/a.xlsx")]);
        assert!(batch.rows.is_empty());
        assert_eq!(batch.files.len(), 1);
        assert!(batch.files[0].error.is_some());
        assert_eq!(batch.files[0].rows, 0);
    }

    #[test]
    fn empty_input_yields_empty_batch() {
        let batch = load_files(&[]);
        assert!(batch.is_empty());
        assert!(batch.files.is_empty());
    }
}
