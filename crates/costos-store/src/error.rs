use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error")]
    Database(#[from] rusqlite::Error),

    #[error("store version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion { found: i32, max_supported: i32 },

    #[error("invalid metadata JSON")]
    Metadata(#[from] serde_json::Error),

    #[error("invalid snapshot document: {path}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to complete snapshot write")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in store")]
    Corrupt(#[from] costos_model::ModelError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
