//! Cell-level helpers over the calamine workbook abstraction.

use calamine::Data;

use costos_model::text::to_number;

/// Borrow the cell's text when it is a string cell, mirroring the
/// `typeof c === "string"` checks the layout detection depends on.
pub fn cell_str(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Render a cell as display text for identity fields (vigencia, cc,
/// centro, uf). Numeric cells print without a trailing `.0` so a year
/// stored as `2023.0` becomes `"2023"`.
pub fn cell_display(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => format!("{b}"),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
    }
}

/// Coerce a cell to a number for aggregable fields; anything that is not
/// numeric coerces to zero.
pub fn cell_number(cell: &Data) -> f64 {
    match cell {
        Data::Float(n) => *n,
        Data::Int(n) => *n as f64,
        Data::String(s) => to_number(s),
        Data::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Data::DateTime(dt) => dt.as_f64(),
        _ => 0.0,
    }
}

/// Parse a cell as a nullable ratio. Unlike [`cell_number`], absence and
/// unparseable text yield `None`, never zero, so ratio averages can
/// exclude the value instead of skewing toward it.
pub fn cell_opt_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(n) => Some(*n),
        Data::Int(n) => Some(*n as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    }
}
