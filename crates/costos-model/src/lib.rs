//! Canonical data model for the visor de costos.
//!
//! Defines the deduplicated monthly cost record ([`CostRow`]), its derived
//! composite identity ([`RowKey`]), the metadata kept per imported source
//! file ([`SourceFile`]), and the text-normalization utilities every other
//! crate relies on for accent/case-insensitive matching.

mod error;
mod format;
mod ids;
mod row;
mod source;
pub mod text;

pub use error::ModelError;
pub use format::DetectedFormat;
pub use ids::{KEY_SEPARATOR, RowKey};
pub use row::{CostRow, MONTHS, SIN_UF, month_index};
pub use source::SourceFile;
