use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open workbook: {path}")]
    WorkbookOpen {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook has no sheets: {path}")]
    EmptyWorkbook { path: PathBuf },

    #[error("failed to read sheet {sheet:?} in {path}")]
    SheetRead {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
