//! SQLite schema and connection setup.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current on-disk schema version, stored in `PRAGMA user_version`.
pub(crate) const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS rows (
    id TEXT PRIMARY KEY,
    vigencia TEXT NOT NULL,
    mes TEXT NOT NULL,
    uf TEXT NOT NULL,
    cc TEXT NOT NULL,
    centro TEXT NOT NULL,
    gastos_generales REAL NOT NULL DEFAULT 0,
    mano_obra REAL NOT NULL DEFAULT 0,
    activos_fijos REAL NOT NULL DEFAULT 0,
    dispensacion REAL NOT NULL DEFAULT 0,
    consumo REAL NOT NULL DEFAULT 0,
    directos REAL NOT NULL DEFAULT 0,
    indirectos REAL NOT NULL DEFAULT 0,
    costo_total REAL NOT NULL DEFAULT 0,
    facturado REAL NOT NULL DEFAULT 0,
    utilidad REAL NOT NULL DEFAULT 0,
    sos REAL
);

CREATE INDEX IF NOT EXISTS idx_rows_vigencia ON rows(vigencia);
CREATE INDEX IF NOT EXISTS idx_rows_cc ON rows(cc);

CREATE TABLE IF NOT EXISTS sources (
    id TEXT PRIMARY KEY,
    filename TEXT NOT NULL,
    detected_type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    rows INTEGER NOT NULL DEFAULT 0,
    years TEXT NOT NULL DEFAULT '[]'
);
"#;

pub(crate) fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    initialize(&conn)?;
    Ok(conn)
}

pub(crate) fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    initialize(&conn)?;
    Ok(conn)
}

/// Apply the schema, gated on the stored version so a database written by
/// a newer build is refused rather than silently rewritten.
fn initialize(conn: &Connection) -> Result<()> {
    let found: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found,
            max_supported: SCHEMA_VERSION,
        });
    }
    conn.execute_batch(SCHEMA)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
