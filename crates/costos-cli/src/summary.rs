use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use costos_model::DetectedFormat;

use crate::types::{ImportResult, ResumenResult, StatusResult};

pub fn print_import(result: &ImportResult) {
    if !result.files.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("File"),
            header_cell("Format"),
            header_cell("Rows"),
            header_cell("Note"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        for file in &result.files {
            table.add_row(vec![
                Cell::new(&file.filename),
                format_cell(file.format.as_ref()),
                Cell::new(file.rows),
                match &file.error {
                    Some(error) => Cell::new(error).fg(Color::Red),
                    None => dim_cell("-"),
                },
            ]);
        }
        println!("{table}");
    }

    match &result.merge {
        Some(merge) => {
            println!(
                "Merged {} rows: {} inserted, {} updated.",
                merge.total(),
                merge.inserted,
                merge.updated
            );
            if let Some(total) = result.vault_rows {
                println!("Vault now holds {total} rows.");
            }
        }
        None if result.session_rows > 0 => {
            println!(
                "Session holds {} rows (not saved to the vault).",
                result.session_rows
            );
        }
        None => println!("No rows loaded."),
    }
}

pub fn print_status(result: &StatusResult) {
    println!("Rows: {}", result.rows);
    if result.years.is_empty() {
        println!("Years: -");
    } else {
        println!("Years: {}", result.years.join(", "));
    }
    if result.sources.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Type"),
        header_cell("Rows"),
        header_cell("Years"),
        header_cell("Imported"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for source in &result.sources {
        table.add_row(vec![
            Cell::new(&source.filename),
            Cell::new(&source.detected_type),
            Cell::new(source.rows),
            Cell::new(source.years.join(", ")),
            dim_cell(&source.created_at),
        ]);
    }
    println!("{table}");
}

pub fn print_resumen(result: &ResumenResult) {
    println!("Rows: {}", result.matched_rows);
    println!("Facturado:   {}", money(result.totals.facturado));
    println!("Costo total: {}", money(result.totals.costo_total));
    println!("Utilidad:    {}", money(result.totals.utilidad));
    match &result.sos {
        Some(sos) => println!(
            "Sos: min {:.2}  avg {:.2}  max {:.2}  ({} rows)",
            sos.min, sos.avg, sos.max, sos.count
        ),
        None => println!("Sos: -"),
    }

    if !result.months.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Month"),
            header_cell("Rows"),
            header_cell("Costo total"),
            header_cell("Facturado"),
            header_cell("Utilidad"),
        ]);
        apply_table_style(&mut table);
        for index in 1..=4 {
            align_column(&mut table, index, CellAlignment::Right);
        }
        for month in &result.months {
            table.add_row(vec![
                Cell::new(&month.mes),
                Cell::new(month.totals.rows),
                Cell::new(money(month.totals.costo_total)),
                Cell::new(money(month.totals.facturado)),
                utilidad_cell(month.totals.utilidad),
            ]);
        }
        println!();
        println!("By month:");
        println!("{table}");
    }

    if !result.centros.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("CC"),
            header_cell("Cost center"),
            header_cell("Rows"),
            header_cell("Costo total"),
            header_cell("Utilidad"),
            header_cell("Sos avg"),
        ]);
        apply_table_style(&mut table);
        for index in 2..=5 {
            align_column(&mut table, index, CellAlignment::Right);
        }
        for centro in &result.centros {
            table.add_row(vec![
                Cell::new(&centro.cc),
                Cell::new(&centro.centro),
                Cell::new(centro.totals.rows),
                Cell::new(money(centro.totals.costo_total)),
                utilidad_cell(centro.totals.utilidad),
                match centro.sos_avg {
                    Some(avg) => Cell::new(format!("{avg:.2}")),
                    None => dim_cell("-"),
                },
            ]);
        }
        println!();
        println!("By cost center:");
        println!("{table}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn format_cell(format: Option<&DetectedFormat>) -> Cell {
    match format {
        Some(DetectedFormat::Unrecognized) => {
            Cell::new(DetectedFormat::Unrecognized.as_str()).fg(Color::Yellow)
        }
        Some(format) => Cell::new(format.as_str()).fg(Color::Green),
        None => dim_cell("-"),
    }
}

fn utilidad_cell(value: f64) -> Cell {
    if value < 0.0 {
        Cell::new(money(value)).fg(Color::Red)
    } else {
        Cell::new(money(value))
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}
