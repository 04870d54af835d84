//! JSON snapshot export/import for backup and transfer between machines.

use std::fs;
use std::path::Path;

use costos_model::{CostRow, SourceFile};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, StoreError};
use crate::vault::{MergeOutcome, Vault};

/// Version tag stamped into every exported snapshot.
pub const SNAPSHOT_VERSION: &str = "v3";

/// Portable snapshot document: the full canonical row set plus the
/// source-file history, with a timestamp and version tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "exportedAt", default)]
    pub exported_at: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rows: Vec<CostRow>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<SourceFile>,
}

/// Treat an explicit JSON `null` the same as a missing list.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snapshot {
    /// Capture the vault's current contents.
    pub fn capture(vault: &Vault) -> Self {
        Self {
            exported_at: chrono::Utc::now().to_rfc3339(),
            version: SNAPSHOT_VERSION.to_string(),
            rows: vault.canonical.values().cloned().collect(),
            sources: vault.sources.clone(),
        }
    }
}

/// Export the vault to a pretty-printed JSON document at `path`.
///
/// The document is written to a sibling temp file first and renamed into
/// place, so a crash mid-write never leaves a truncated snapshot behind.
pub fn export_snapshot(vault: &Vault, path: &Path) -> Result<Snapshot> {
    let snapshot = Snapshot::capture(vault);
    let body = serde_json::to_string_pretty(&snapshot)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, body).map_err(|source| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
        temp_path,
        target_path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        rows = snapshot.rows.len(),
        sources = snapshot.sources.len(),
        "snapshot exported"
    );
    Ok(snapshot)
}

/// Import a snapshot document, merging its rows into the vault with the
/// same overwrite-on-identity semantics as a file import, then reload the
/// mirror from storage.
pub fn import_snapshot(vault: &mut Vault, path: &Path) -> Result<MergeOutcome> {
    let body = fs::read_to_string(path).map_err(|source| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot =
        serde_json::from_str(&body).map_err(|source| StoreError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;

    if !snapshot.version.is_empty() && snapshot.version != SNAPSHOT_VERSION {
        tracing::warn!(
            found = %snapshot.version,
            expected = SNAPSHOT_VERSION,
            "snapshot version differs, importing anyway"
        );
    }

    let outcome = vault.persist(snapshot.rows, snapshot.sources)?;
    vault.load_all()?;
    tracing::info!(
        path = %path.display(),
        inserted = outcome.inserted,
        updated = outcome.updated,
        "snapshot imported"
    );
    Ok(outcome)
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
    fn export_then_import_restores_rows_and_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut origin = Vault::open_in_memory().unwrap();
        let mut tagged = row("2023", "enero", "101", "101-Farmacia", 99.0);
        tagged.source = Some("costos.xlsx".into());
        origin.save_session(vec![tagged]).unwrap();
        let exported = export_snapshot(&origin, &path).unwrap();
        assert_eq!(exported.version, SNAPSHOT_VERSION);

        let db_path = dir.path().join("copy.db");
        let mut copy = Vault::open(&db_path).unwrap();
        let outcome = import_snapshot(&mut copy, &path).unwrap();
        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.updated, 0);
        assert_eq!(copy.row_count(), 1);
        assert_eq!(copy.rows().next().unwrap().costo_total, 99.0);
        assert_eq!(copy.sources().len(), 1);
        assert_eq!(copy.sources()[0].filename, "costos.xlsx");
    }

    #[test]
    fn import_tolerates_null_lists_and_missing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(
            &path,
            r#"{
                "exportedAt": "2024-05-01T00:00:00Z",
                "version": "v3",
                "rows": [{
                    "vigencia": "2023", "mes": "enero", "uf": "Sin UF",
                    "cc": "101", "centro": "Farmacia",
                    "gastos_generales": 0.0, "mano_obra": 0.0,
                    "activos_fijos": 0.0, "dispensacion": 0.0, "consumo": 0.0,
                    "directos": 0.0, "indirectos": 0.0, "costo_total": 5.0,
                    "facturado": 0.0, "utilidad": 0.0, "sos": null
                }],
                "sources": null
            }"#,
        )
        .unwrap();

        let mut vault = Vault::open_in_memory().unwrap();
        let outcome = import_snapshot(&mut vault, &path).unwrap();
        assert_eq!(outcome.inserted, 1);
        let stored = vault.rows().next().unwrap();
        assert!(stored.id.is_some());
        assert_eq!(stored.sos, None);
        assert!(vault.sources().is_empty());
    }

    #[test]
    fn import_rejects_malformed_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let mut vault = Vault::open_in_memory().unwrap();
        let err = import_snapshot(&mut vault, &path).unwrap_err();
        assert!(matches!(err, StoreError::Snapshot { .. }));
        assert!(vault.is_empty());
    }

    #[test]
    fn imported_rows_merge_with_existing_vault_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let mut origin = Vault::open_in_memory().unwrap();
        origin
            .save_rows(vec![row("2023", "enero", "101", "Farmacia", 1.0)])
            .unwrap();
        export_snapshot(&origin, &path).unwrap();

        let mut target = Vault::open_in_memory().unwrap();
        target
            .save_rows(vec![
                row("2023", "enero", "101", "Farmacia", 999.0),
                row("2023", "febrero", "101", "Farmacia", 2.0),
            ])
            .unwrap();

        let outcome = import_snapshot(&mut target, &path).unwrap();
        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.updated, 1);
        assert_eq!(target.row_count(), 2);
        let overwritten = target
            .rows()
            .find(|r| r.mes == "enero")
            .unwrap();
        assert_eq!(overwritten.costo_total, 1.0);
    }
}
