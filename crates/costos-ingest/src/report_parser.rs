//! Parser for the operational cost-list report layout.
//!
//! This layout encodes hierarchy positionally rather than per-row: a
//! "Centros de Produccion" section row names the cost center for every
//! data row that follows, and a "Mes ..." header row carries the fiscal
//! year and the column layout. The parser is a left-to-right fold over
//! the sheet rows with that context held in an explicit [`ParserState`].

use std::collections::BTreeMap;

use calamine::{Data, Range};

use costos_model::text::{canonicalize_month, normalize_for_match};
use costos_model::{CostRow, SIN_UF, month_index};

use crate::workbook::{cell_number, cell_opt_number, cell_str};

/// Fixed column offset of the cost-center display name within a
/// "Centros de Produccion" section row.
const CENTRO_NAME_COLUMN: usize = 4;

/// Cross-row parsing context.
#[derive(Debug, Default)]
struct ParserState {
    /// Display name of the current cost center.
    centro: String,
    /// Numeric code extracted from the current center name; empty when
    /// the name does not follow the `<digits>-<name>` pattern.
    cc: String,
    /// Fiscal year from the most recent header row.
    year: String,
    /// Lowercased, trimmed header text to column index, rebuilt at each
    /// header row.
    columns: BTreeMap<String, usize>,
}

pub fn parse(range: &Range<Data>) -> Vec<CostRow> {
    let mut state = ParserState::default();
    let mut out = Vec::new();
    for row in range.rows() {
        scan_row(row, &mut state, &mut out);
    }
    out
}

fn scan_row(row: &[Data], state: &mut ParserState, out: &mut Vec<CostRow>) {
    let Some(first) = row.first().and_then(cell_str) else {
        return;
    };
    let normalized = normalize_for_match(first);

    if normalized.contains("centros de produccion") {
        state.centro = row
            .get(CENTRO_NAME_COLUMN)
            .and_then(cell_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        state.cc = leading_code(&state.centro);
        return;
    }

    if normalized.starts_with("mes") {
        state.year = four_digit_year(first).unwrap_or_default();
        state.columns = header_columns(row);
        return;
    }

    let mes = canonicalize_month(first);
    if month_index(&mes).is_none() {
        // "Totales" and other noise rows: skipped without touching state.
        return;
    }

    let column = |key: &str| state.columns.get(key).and_then(|&idx| row.get(idx));
    let number = |key: &str| column(key).map(cell_number).unwrap_or(0.0);

    let administrativo = number("administrativo");
    let logistico = number("logistico");

    let mut cost_row = CostRow {
        vigencia: state.year.clone(),
        mes,
        uf: SIN_UF.to_string(),
        cc: state.cc.clone(),
        centro: state.centro.clone(),
        gastos_generales: number("gastos generales"),
        mano_obra: number("mano de obra"),
        activos_fijos: number("activos fijos"),
        dispensacion: number("dispensacion"),
        consumo: number("consumo"),
        directos: number("primaria"),
        indirectos: administrativo + logistico,
        costo_total: number("total"),
        facturado: number("facturado"),
        utilidad: number("utilidad"),
        sos: sos_value(row, &state.columns),
        ..CostRow::default()
    };
    cost_row.ensure_id();
    out.push(cost_row);
}

/// Resolve the sos ratio cell.
///
/// Heuristic preserved from the original report format: of all columns
/// whose header is exactly `%`, take the rightmost; when none exists,
/// fall back to the very last cell of the row. Unparseable values stay
/// `None`, never zero.
fn sos_value(row: &[Data], columns: &BTreeMap<String, usize>) -> Option<f64> {
    let idx = columns
        .iter()
        .filter(|(key, _)| key.as_str() == "%")
        .map(|(_, &idx)| idx)
        .max()
        .unwrap_or_else(|| row.len().saturating_sub(1));
    row.get(idx).and_then(cell_opt_number)
}

/// Map of lowercased, trimmed header text to column index; non-string
/// cells are skipped.
fn header_columns(row: &[Data]) -> BTreeMap<String, usize> {
    let mut columns = BTreeMap::new();
    for (idx, cell) in row.iter().enumerate() {
        if let Some(text) = cell_str(cell) {
            columns.insert(text.trim().to_lowercase(), idx);
        }
    }
    columns
}

/// Extract the leading numeric code from a `<digits>-<name>` center
/// label (hyphen or en dash); empty when the pattern does not match.
fn leading_code(centro: &str) -> String {
    let trimmed = centro.trim_start();
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    let rest = trimmed[digits.len()..].trim_start();
    if rest.starts_with('-') || rest.starts_with('\u{2013}') {
        digits
    } else {
        String::new()
    }
}

/// First run of four consecutive digits in the text, e.g. the year in
/// "Mes 2023".
fn four_digit_year(text: &str) -> Option<String> {
    let mut run = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            run.push(c);
            if run.len() == 4 {
                return Some(run);
            }
        } else {
            run.clear();
        }
    }
    None
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

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn section_and_header_rows_feed_data_rows() {
        let range = sheet(&[
            vec![
                s("Centros de Produccion"),
                Data::Empty,
                Data::Empty,
                Data::Empty,
                s("101-Farmacia"),
            ],
            vec![s("Mes 2023"), Data::Empty, Data::Empty, s("Total"), s("Facturado")],
            vec![
                s("Enero"),
                Data::Empty,
                Data::Empty,
                Data::Float(1_000_000.0),
                Data::Float(1_200_000.0),
            ],
        ]);

        let rows = parse(&range);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.cc, "101");
        assert_eq!(row.centro, "101-Farmacia");
        assert_eq!(row.vigencia, "2023");
        assert_eq!(row.mes, "enero");
        assert_eq!(row.costo_total, 1_000_000.0);
        assert_eq!(row.facturado, 1_200_000.0);
        assert_eq!(row.uf, SIN_UF);
        assert!(row.id.is_some());
    }

    #[test]
    fn totales_row_is_ignored_and_state_survives() {
        let range = sheet(&[
            vec![
                s("Centros de Produccion"),
                Data::Empty,
                Data::Empty,
                Data::Empty,
                s("205-Urgencias"),
            ],
            vec![s("Mes 2022"), s("Total")],
            vec![s("Totales"), Data::Float(99.0)],
            vec![s("Febrero"), Data::Float(500.0)],
        ]);

        let rows = parse(&range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mes, "febrero");
        assert_eq!(rows[0].cc, "205");
        assert_eq!(rows[0].vigencia, "2022");
        // "Total" header sits at column 1 in this layout.
        assert_eq!(rows[0].costo_total, 500.0);
    }

    #[test]
    fn indirectos_sums_administrativo_and_logistico() {
        let range = sheet(&[
            vec![
                s("Centros de Produccion"),
                Data::Empty,
                Data::Empty,
                Data::Empty,
                s("301-Laboratorio"),
            ],
            vec![s("Mes 2024"), s("Administrativo"), s("Logistico"), s("Primaria")],
            vec![s("Marzo"), Data::Float(10.0), Data::Float(5.0), Data::Float(70.0)],
        ]);

        let rows = parse(&range);
        assert_eq!(rows[0].indirectos, 15.0);
        assert_eq!(rows[0].directos, 70.0);
    }

    #[test]
    fn sos_comes_from_rightmost_percent_column() {
        let range = sheet(&[
            vec![
                s("Centros de Produccion"),
                Data::Empty,
                Data::Empty,
                Data::Empty,
                s("101-Farmacia"),
            ],
            vec![s("Mes 2023"), s("%"), s("Total"), s("%")],
            vec![s("Abril"), Data::Float(0.5), Data::Float(100.0), Data::Float(0.25)],
        ]);

        let rows = parse(&range);
        assert_eq!(rows[0].sos, Some(0.25));
    }

    #[test]
    fn unparseable_sos_stays_null() {
        let range = sheet(&[
            vec![
                s("Centros de Produccion"),
                Data::Empty,
                Data::Empty,
                Data::Empty,
                s("101-Farmacia"),
            ],
            vec![s("Mes 2023"), s("Total")],
            vec![s("Mayo"), s("sin dato")],
        ]);

        let rows = parse(&range);
        // No "%" header: falls back to the last cell of the row.
        assert_eq!(rows[0].sos, None);
    }

    #[test]
    fn center_without_code_pattern_yields_empty_cc() {
        assert_eq!(leading_code("Farmacia"), "");
        assert_eq!(leading_code("101 Farmacia"), "");
        assert_eq!(leading_code("101-Farmacia"), "101");
        assert_eq!(leading_code("  205 \u{2013} Urgencias"), "205");
    }

    #[test]
    fn year_extraction_takes_first_four_digit_run() {
        assert_eq!(four_digit_year("Mes 2023"), Some("2023".to_string()));
        assert_eq!(four_digit_year("Mes"), None);
        assert_eq!(four_digit_year("Mes 20233"), Some("2023".to_string()));
    }
}
