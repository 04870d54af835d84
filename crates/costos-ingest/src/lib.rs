//! Spreadsheet ingestion for the visor de costos.
//!
//! Turns heterogeneous Excel exports into canonical [`costos_model::CostRow`]
//! batches: a format detector classifies each workbook into one of two known
//! layouts (or "unrecognized", a silent no-op), and a layout-specific parser
//! produces rows with identity already assigned. Batch loading is always
//! best-effort: one bad file never aborts its siblings.

mod batch;
mod costos_sheet;
mod detect;
mod error;
mod report_parser;
mod workbook;

pub use batch::{FileOutcome, SessionBatch, load_files};
pub use detect::{ParsedFile, detect_and_parse};
pub use error::{IngestError, Result};
pub use workbook::{cell_display, cell_number, cell_opt_number, cell_str};
