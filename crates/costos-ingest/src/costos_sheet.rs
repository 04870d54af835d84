//! Parser for the structured `COSTOS` sheet layout.
//!
//! The sheet is header-keyed: the first row names the columns and every
//! following row is one record. Two header-naming conventions circulate
//! (the current mixed-case one and a legacy all-caps one); both are
//! accepted per field, first non-empty match wins.

use calamine::{Data, Range};

use costos_model::text::canonicalize_month;
use costos_model::{CostRow, SIN_UF, month_index};

use crate::workbook::{cell_display, cell_number, cell_opt_number, cell_str};

pub fn parse(range: &Range<Data>) -> Vec<CostRow> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    // Header text is kept verbatim (no trimming): the legacy convention
    // includes oddities like a trailing space in "EXCEDENTE ".
    let headers: Vec<Option<&str>> = header.iter().map(cell_str).collect();

    let mut out = Vec::new();
    for record in rows {
        let field = |names: &[&str]| -> Option<&Data> {
            for name in names {
                if let Some(pos) = headers.iter().position(|h| *h == Some(*name)) {
                    match record.get(pos) {
                        Some(Data::Empty) | None => {}
                        Some(cell) => return Some(cell),
                    }
                }
            }
            None
        };
        let display = |names: &[&str]| field(names).map(cell_display).unwrap_or_default();
        let number = |names: &[&str]| field(names).map(cell_number).unwrap_or(0.0);

        let mes = canonicalize_month(&display(&["Mes", "MES"]));
        if month_index(&mes).is_none() {
            continue;
        }

        let uf = display(&["Unidad Funcional", "UF"]);
        let mut row = CostRow {
            vigencia: display(&["VIGENCIA"]),
            mes,
            uf: if uf.is_empty() { SIN_UF.to_string() } else { uf },
            cc: display(&["cc.", "C.C."]),
            centro: display(&["Centro de Costos", "NOMBRE"]),
            gastos_generales: number(&["Gastos Generales", "GASTOS GENERALES"]),
            mano_obra: number(&["Mano de Obra", "MANO DE OBRA"]),
            activos_fijos: number(&["Activos Fijos", "ACTIVOS FIJOS"]),
            dispensacion: number(&["Dispensación", "DISPENSACIÓN"]),
            consumo: number(&["Consumo", "CONSUMO"]),
            directos: number(&["Directos", "COSTOS DIRECTOS"]),
            indirectos: number(&["Indirectos", "COSTOS INDIRECTOS"]),
            costo_total: number(&["Costo total", "COSTO TOTAL"]),
            facturado: number(&["Facturado", "VALOR FACTURADO"]),
            utilidad: number(&["Utilidad", "EXCEDENTE "]),
            sos: field(&["% Sos"]).and_then(cell_opt_number),
            ..CostRow::default()
        };
        row.ensure_id();
        out.push(row);
    }
    out
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
    fn current_header_convention_maps_all_fields() {
        let range = sheet(&[
            vec![
                s("VIGENCIA"),
                s("Mes"),
                s("Unidad Funcional"),
                s("cc."),
                s("Centro de Costos"),
                s("Costo total"),
                s("Facturado"),
                s("% Sos"),
            ],
            vec![
                Data::Float(2023.0),
                s("Enero"),
                s("Hospitalizacion"),
                Data::Float(101.0),
                s("Farmacia"),
                Data::Float(1000.0),
                Data::Float(1200.0),
                Data::Float(0.2),
            ],
        ]);

        let rows = parse(&range);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.vigencia, "2023");
        assert_eq!(row.mes, "enero");
        assert_eq!(row.uf, "Hospitalizacion");
        assert_eq!(row.cc, "101");
        assert_eq!(row.centro, "Farmacia");
        assert_eq!(row.costo_total, 1000.0);
        assert_eq!(row.facturado, 1200.0);
        assert_eq!(row.sos, Some(0.2));
        assert!(row.id.is_some());
    }

    #[test]
    fn legacy_header_convention_is_accepted() {
        let range = sheet(&[
            vec![
                s("VIGENCIA"),
                s("MES"),
                s("C.C."),
                s("NOMBRE"),
                s("COSTO TOTAL"),
                s("VALOR FACTURADO"),
                s("EXCEDENTE "),
            ],
            vec![
                s("2021"),
                s("FEB"),
                s("42"),
                s("Urgencias"),
                Data::Float(800.0),
                Data::Float(900.0),
                Data::Float(100.0),
            ],
        ]);

        let rows = parse(&range);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.mes, "febrero");
        assert_eq!(row.cc, "42");
        assert_eq!(row.centro, "Urgencias");
        assert_eq!(row.utilidad, 100.0);
        // No functional-unit column in the legacy convention.
        assert_eq!(row.uf, SIN_UF);
        // No "% Sos" column at all: ratio stays null.
        assert_eq!(row.sos, None);
    }

    #[test]
    fn rows_without_resolvable_month_are_dropped() {
        let range = sheet(&[
            vec![s("VIGENCIA"), s("Mes"), s("Costo total")],
            vec![s("2023"), s("Enero"), Data::Float(10.0)],
            vec![s("2023"), Data::Empty, Data::Float(20.0)],
            vec![s("2023"), s("Totales"), Data::Float(30.0)],
        ]);

        let rows = parse(&range);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mes, "enero");
    }

    #[test]
    fn absent_sos_cell_stays_null_not_zero() {
        let range = sheet(&[
            vec![s("VIGENCIA"), s("Mes"), s("% Sos")],
            vec![s("2023"), s("Marzo"), Data::Empty],
        ]);

        let rows = parse(&range);
        assert_eq!(rows[0].sos, None);
    }
}
