//! The vault: durable row storage plus an in-memory canonical mirror.

use std::collections::BTreeMap;
use std::path::Path;

use costos_model::{CostRow, RowKey, SourceFile};
use rusqlite::{Connection, params};

use crate::db;
use crate::error::Result;

/// Fallback group name for session rows without a source tag.
const UNNAMED_SOURCE: &str = "Archivo";

const UPSERT_ROW: &str = "\
INSERT OR REPLACE INTO rows (\
    id, vigencia, mes, uf, cc, centro, \
    gastos_generales, mano_obra, activos_fijos, dispensacion, consumo, \
    directos, indirectos, costo_total, facturado, utilidad, sos\
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

const UPSERT_SOURCE: &str = "\
INSERT OR REPLACE INTO sources (id, filename, detected_type, created_at, rows, years) \
VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const SELECT_ROWS: &str = "\
SELECT id, vigencia, mes, uf, cc, centro, \
       gastos_generales, mano_obra, activos_fijos, dispensacion, consumo, \
       directos, indirectos, costo_total, facturado, utilidad, sos \
FROM rows";

const SELECT_SOURCES: &str = "\
SELECT id, filename, detected_type, created_at, rows, years \
FROM sources ORDER BY created_at, filename";

/// Counts reported by a merge: rows whose identity was new to the vault
/// versus rows that overwrote an existing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub inserted: u64,
    pub updated: u64,
}

impl MergeOutcome {
    pub fn total(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Persistent store of canonical cost rows and source-file metadata.
///
/// All writes go through a single transaction per merge; the in-memory
/// mirror is only touched after the transaction commits, so a failed save
/// leaves both the database and the mirror at their previous state.
pub struct Vault {
    pub(crate) conn: Connection,
    pub(crate) canonical: BTreeMap<RowKey, CostRow>,
    pub(crate) sources: Vec<SourceFile>,
}

impl Vault {
    /// Open (or create) the vault database at `path` and load its contents.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        let mut vault = Self {
            conn,
            canonical: BTreeMap::new(),
            sources: Vec::new(),
        };
        vault.load_all()?;
        Ok(vault)
    }

    /// Open a throwaway in-memory vault.
    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self {
            conn,
            canonical: BTreeMap::new(),
            sources: Vec::new(),
        })
    }

    /// Reload the mirror wholesale from the database.
    pub fn load_all(&mut self) -> Result<()> {
        let mut canonical = BTreeMap::new();
        {
            let mut stmt = self.conn.prepare(SELECT_ROWS)?;
            let mut rows = stmt.query([])?;
            while let Some(record) = rows.next()? {
                let id: String = record.get(0)?;
                let key = RowKey::new(id)?;
                let row = CostRow {
                    vigencia: record.get(1)?,
                    mes: record.get(2)?,
                    uf: record.get(3)?,
                    cc: record.get(4)?,
                    centro: record.get(5)?,
                    gastos_generales: record.get(6)?,
                    mano_obra: record.get(7)?,
                    activos_fijos: record.get(8)?,
                    dispensacion: record.get(9)?,
                    consumo: record.get(10)?,
                    directos: record.get(11)?,
                    indirectos: record.get(12)?,
                    costo_total: record.get(13)?,
                    facturado: record.get(14)?,
                    utilidad: record.get(15)?,
                    sos: record.get(16)?,
                    id: Some(key.clone()),
                    source: None,
                };
                canonical.insert(key, row);
            }
        }

        let mut sources = Vec::new();
        {
            let mut stmt = self.conn.prepare(SELECT_SOURCES)?;
            let mut records = stmt.query([])?;
            while let Some(record) = records.next()? {
                let years_json: String = record.get(5)?;
                sources.push(SourceFile {
                    id: record.get(0)?,
                    filename: record.get(1)?,
                    detected_type: record.get(2)?,
                    created_at: record.get(3)?,
                    rows: record.get(4)?,
                    years: serde_json::from_str(&years_json)?,
                });
            }
        }

        self.canonical = canonical;
        self.sources = sources;
        tracing::debug!(
            rows = self.canonical.len(),
            sources = self.sources.len(),
            "vault loaded"
        );
        Ok(())
    }

    /// Merge a batch of rows into the vault, overwriting on identity.
    pub fn save_rows(&mut self, rows: Vec<CostRow>) -> Result<MergeOutcome> {
        self.persist(rows, Vec::new())
    }

    /// Merge a session's rows and record one [`SourceFile`] per originating
    /// filename, in first-seen order. Untagged rows fall into a shared
    /// "Archivo" group.
    pub fn save_session(&mut self, rows: Vec<CostRow>) -> Result<MergeOutcome> {
        let mut order: Vec<String> = Vec::new();
        let mut groups: BTreeMap<String, Vec<CostRow>> = BTreeMap::new();
        for row in rows {
            let name = row
                .source
                .clone()
                .unwrap_or_else(|| UNNAMED_SOURCE.to_string());
            if !groups.contains_key(&name) {
                order.push(name.clone());
            }
            groups.entry(name).or_default().push(row);
        }

        let mut all_rows = Vec::new();
        let mut sources = Vec::new();
        for name in order {
            if let Some(group) = groups.remove(&name) {
                sources.push(SourceFile::for_batch(&name, "auto", &group));
                all_rows.extend(group);
            }
        }
        self.persist(all_rows, sources)
    }

    /// Delete everything: all rows, all source records, and the mirror.
    pub fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM rows", [])?;
        tx.execute("DELETE FROM sources", [])?;
        tx.commit()?;
        self.canonical.clear();
        self.sources.clear();
        tracing::info!("vault cleared");
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &CostRow> {
        self.canonical.values()
    }

    pub fn row_count(&self) -> usize {
        self.canonical.len()
    }

    pub fn get(&self, key: &RowKey) -> Option<&CostRow> {
        self.canonical.get(key)
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Write rows and source records in one transaction, then fold the
    /// committed rows into the mirror, counting inserts vs. overwrites.
    pub(crate) fn persist(
        &mut self,
        rows: Vec<CostRow>,
        mut sources: Vec<SourceFile>,
    ) -> Result<MergeOutcome> {
        let keyed: Vec<(RowKey, CostRow)> = rows
            .into_iter()
            .map(|mut row| {
                let key = row.ensure_id().clone();
                (key, row)
            })
            .collect();
        for source in &mut sources {
            source.ensure_id();
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_ROW)?;
            for (key, row) in &keyed {
                stmt.execute(params![
                    key.as_str(),
                    row.vigencia,
                    row.mes,
                    row.uf,
                    row.cc,
                    row.centro,
                    row.gastos_generales,
                    row.mano_obra,
                    row.activos_fijos,
                    row.dispensacion,
                    row.consumo,
                    row.directos,
                    row.indirectos,
                    row.costo_total,
                    row.facturado,
                    row.utilidad,
                    row.sos,
                ])?;
            }

            let mut stmt = tx.prepare(UPSERT_SOURCE)?;
            for source in &sources {
                let years = serde_json::to_string(&source.years)?;
                stmt.execute(params![
                    source.id,
                    source.filename,
                    source.detected_type,
                    source.created_at,
                    source.rows,
                    years,
                ])?;
            }
        }
        tx.commit()?;

        let mut outcome = MergeOutcome::default();
        for (key, row) in keyed {
            match self.canonical.insert(key, row) {
                Some(_) => outcome.updated += 1,
                None => outcome.inserted += 1,
            }
        }
        self.sources.extend(sources);
        tracing::info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            "merge committed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(vigencia: &str, mes: &str, cc: &str, centro: &str, total: f64) -> CostRow {
        CostRow {
            vigencia: vigencia.into(),
            mes: mes.into(),
            cc: cc.into(),
            centro: centro.into(),
            costo_total: total,
            ..CostRow::default()
        }
    }

    #[test]
    fn first_merge_inserts_second_merge_updates() {
        let mut vault = Vault::open_in_memory().unwrap();
        let rows = vec![
            row("2023", "enero", "101", "101-Farmacia", 100.0),
            row("2023", "febrero", "101", "101-Farmacia", 110.0),
        ];
        let first = vault.save_rows(rows.clone()).unwrap();
        assert_eq!(first, MergeOutcome { inserted: 2, updated: 0 });

        let second = vault.save_rows(rows).unwrap();
        assert_eq!(second, MergeOutcome { inserted: 0, updated: 2 });
        assert_eq!(vault.row_count(), 2);
    }

    #[test]
    fn overwrite_on_identity_keeps_latest_values() {
        let mut vault = Vault::open_in_memory().unwrap();
        vault
            .save_rows(vec![row("2023", "enero", "101", "Farmacia", 100.0)])
            .unwrap();
        vault
            .save_rows(vec![row("2023", "enero", "101", "Farmacia", 250.0)])
            .unwrap();

        assert_eq!(vault.row_count(), 1);
        let stored = vault.rows().next().unwrap();
        assert_eq!(stored.costo_total, 250.0);
    }

    #[test]
    fn identity_case_folds_across_merges() {
        let mut vault = Vault::open_in_memory().unwrap();
        vault
            .save_rows(vec![row("2023", "enero", "101", "FARMACIA", 100.0)])
            .unwrap();
        let outcome = vault
            .save_rows(vec![row("2023", "enero", "101", "farmacia", 200.0)])
            .unwrap();
        assert_eq!(outcome, MergeOutcome { inserted: 0, updated: 1 });
        assert_eq!(vault.row_count(), 1);
    }

    #[test]
    fn save_session_groups_sources_by_filename_in_first_seen_order() {
        let mut vault = Vault::open_in_memory().unwrap();
        let mut a1 = row("2023", "enero", "101", "Farmacia", 1.0);
        a1.source = Some("b.xlsx".into());
        let mut b = row("2023", "enero", "102", "Lab", 2.0);
        b.source = Some("a.xlsx".into());
        let mut a2 = row("2023", "febrero", "101", "Farmacia", 3.0);
        a2.source = Some("b.xlsx".into());

        vault.save_session(vec![a1, b, a2]).unwrap();

        let sources = vault.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].filename, "b.xlsx");
        assert_eq!(sources[0].rows, 2);
        assert_eq!(sources[1].filename, "a.xlsx");
        assert_eq!(sources[1].rows, 1);
        assert!(sources.iter().all(|s| s.detected_type == "auto"));
        assert!(sources.iter().all(|s| s.years == vec!["2023".to_string()]));
    }

    #[test]
    fn untagged_session_rows_fall_into_shared_group() {
        let mut vault = Vault::open_in_memory().unwrap();
        vault
            .save_session(vec![
                row("2023", "enero", "101", "Farmacia", 1.0),
                row("2023", "febrero", "101", "Farmacia", 2.0),
            ])
            .unwrap();
        assert_eq!(vault.sources().len(), 1);
        assert_eq!(vault.sources()[0].filename, "Archivo");
        assert_eq!(vault.sources()[0].rows, 2);
    }

    #[test]
    fn contents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.db");
        {
            let mut vault = Vault::open(&path).unwrap();
            let mut tagged = row("2024", "marzo", "200", "Urgencias", 42.0);
            tagged.source = Some("costos.xlsx".into());
            vault.save_session(vec![tagged]).unwrap();
        }

        let vault = Vault::open(&path).unwrap();
        assert_eq!(vault.row_count(), 1);
        let stored = vault.rows().next().unwrap();
        assert_eq!(stored.centro, "Urgencias");
        assert_eq!(stored.costo_total, 42.0);
        assert_eq!(stored.sos, None);
        assert_eq!(vault.sources().len(), 1);
        assert_eq!(vault.sources()[0].filename, "costos.xlsx");
        assert_eq!(vault.sources()[0].years, vec!["2024".to_string()]);
    }

    #[test]
    fn clear_removes_rows_and_sources() {
        let mut vault = Vault::open_in_memory().unwrap();
        let mut tagged = row("2023", "enero", "101", "Farmacia", 1.0);
        tagged.source = Some("a.xlsx".into());
        vault.save_session(vec![tagged]).unwrap();
        assert!(!vault.is_empty());

        vault.clear().unwrap();
        assert!(vault.is_empty());
        assert!(vault.sources().is_empty());
        assert_eq!(vault.rows().count(), 0);
    }
}
