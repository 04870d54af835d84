//! Workbook layout autodetection.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use costos_model::text::normalize_for_match;
use costos_model::{CostRow, DetectedFormat};

use crate::error::{IngestError, Result};
use crate::workbook::cell_str;
use crate::{costos_sheet, report_parser};

/// How many leading rows of the first sheet feed the detection blob.
const DETECT_ROWS: usize = 20;

/// Marker phrases (normalized) that identify the operational report.
const REPORT_MARKERS: [&str; 2] = ["fecha impresion", "centros de produccion"];

/// Sheet name that identifies the structured layout.
const COSTOS_SHEET: &str = "COSTOS";

/// A classified workbook and the rows its parser produced.
#[derive(Debug)]
pub struct ParsedFile {
    pub format: DetectedFormat,
    pub rows: Vec<CostRow>,
}

/// Open a workbook, classify its layout, and run the matching parser.
///
/// An unrecognized layout is a silent no-op (zero rows, no error) so that
/// one unknown file in a mixed batch never aborts its siblings. Errors are
/// reserved for files that cannot be opened or read at all.
pub fn detect_and_parse(path: &Path) -> Result<ParsedFile> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?;

    let first_range =
        workbook
            .worksheet_range(&first_sheet)
            .map_err(|e| IngestError::SheetRead {
                path: path.to_path_buf(),
                sheet: first_sheet.clone(),
                source: e,
            })?;

    if is_operational_report(&first_range) {
        let rows = report_parser::parse(&first_range);
        tracing::debug!(file = %path.display(), rows = rows.len(), "parsed operational report");
        return Ok(ParsedFile {
            format: DetectedFormat::OperationalReport,
            rows,
        });
    }

    if sheet_names.iter().any(|name| name == COSTOS_SHEET) {
        let range = workbook
            .worksheet_range(COSTOS_SHEET)
            .map_err(|e| IngestError::SheetRead {
                path: path.to_path_buf(),
                sheet: COSTOS_SHEET.to_string(),
                source: e,
            })?;
        let rows = costos_sheet::parse(&range);
        tracing::debug!(file = %path.display(), rows = rows.len(), "parsed COSTOS sheet");
        return Ok(ParsedFile {
            format: DetectedFormat::CostosSheet,
            rows,
        });
    }

    tracing::debug!(file = %path.display(), "no known layout matched");
    Ok(ParsedFile {
        format: DetectedFormat::Unrecognized,
        rows: Vec::new(),
    })
}

/// Flatten the first rows of a sheet into one normalized text blob and
/// look for the report marker phrases.
fn is_operational_report(range: &Range<Data>) -> bool {
    let blob: String = range
        .rows()
        .take(DETECT_ROWS)
        .flat_map(|row| row.iter())
        .filter_map(cell_str)
        .collect::<Vec<_>>()
        .join(" ");
    let blob = normalize_for_match(&blob);
    REPORT_MARKERS.iter().any(|marker| blob.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[Vec<Data>]) -> Range<Data> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(1);
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, cols as u32 - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !matches!(cell, Data::Empty) {
                    range.set_value((r as u32, c as u32), cell.clone());
                }
            }
        }
        range
    }

    #[test]
    fn marker_phrases_are_accent_insensitive() {
        let range = sheet(&[vec![Data::String("Fecha Impresión: 01/02/2023".into())]]);
        assert!(is_operational_report(&range));

        let range = sheet(&[vec![Data::String("CENTROS DE PRODUCCIÓN".into())]]);
        assert!(is_operational_report(&range));

        let range = sheet(&[vec![Data::String("informe mensual".into())]]);
        assert!(!is_operational_report(&range));
    }

    #[test]
    fn markers_beyond_the_preview_window_are_ignored() {
        let mut rows: Vec<Vec<Data>> = (0..DETECT_ROWS)
            .map(|i| vec![Data::String(format!("fila {i}"))])
            .collect();
        rows.push(vec![Data::String("fecha impresion".into())]);
        assert!(!is_operational_report(&sheet(&rows)));
    }
}
