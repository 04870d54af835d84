use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use costos_ingest::load_files;
use costos_report::{FilterSet, by_centro, by_month, sos_stats, totals, years};
use costos_store::{Vault, export_snapshot, import_snapshot};

use crate::cli::{ClearArgs, ExportArgs, ImportArgs, ResumenArgs, SnapshotArgs};
use crate::types::{ImportResult, ResumenResult, StatusResult};

pub fn run_import(db: &Path, args: &ImportArgs) -> Result<ImportResult> {
    let batch = load_files(&args.files);
    let session_rows = batch.rows.len();

    if args.session_only {
        info!(rows = session_rows, "session kept in memory only");
        return Ok(ImportResult {
            files: batch.files,
            session_rows,
            merge: None,
            vault_rows: None,
        });
    }

    let mut vault = Vault::open(db).context("open vault")?;
    let merge = if batch.rows.is_empty() {
        None
    } else {
        Some(vault.save_session(batch.rows).context("save session")?)
    };
    Ok(ImportResult {
        files: batch.files,
        session_rows,
        merge,
        vault_rows: Some(vault.row_count()),
    })
}

pub fn run_status(db: &Path) -> Result<StatusResult> {
    let vault = Vault::open(db).context("open vault")?;
    let years = years(vault.rows());
    let mut sources = vault.sources().to_vec();
    sources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(StatusResult {
        rows: vault.row_count(),
        years,
        sources,
    })
}

pub fn run_resumen(db: &Path, args: &ResumenArgs) -> Result<ResumenResult> {
    let vault = Vault::open(db).context("open vault")?;
    let filter = FilterSet {
        vigencias: to_set(&args.vigencias),
        meses: to_set(&args.meses),
        ufs: to_set(&args.ufs),
        query: args.buscar.clone(),
    };
    let matched = filter.apply(vault.rows());
    Ok(ResumenResult {
        matched_rows: matched.len(),
        totals: totals(matched.iter().copied()),
        months: by_month(matched.iter().copied()),
        centros: by_centro(matched.iter().copied()),
        sos: sos_stats(matched.iter().copied()),
    })
}

pub fn run_export(db: &Path, args: &ExportArgs) -> Result<(usize, usize)> {
    let vault = Vault::open(db).context("open vault")?;
    let snapshot = export_snapshot(&vault, &args.path).context("export snapshot")?;
    Ok((snapshot.rows.len(), snapshot.sources.len()))
}

pub fn run_import_snapshot(db: &Path, args: &SnapshotArgs) -> Result<ImportResult> {
    let mut vault = Vault::open(db).context("open vault")?;
    let merge = import_snapshot(&mut vault, &args.path).context("import snapshot")?;
    Ok(ImportResult {
        files: Vec::new(),
        session_rows: merge.total() as usize,
        merge: Some(merge),
        vault_rows: Some(vault.row_count()),
    })
}

pub fn run_clear(db: &Path, args: &ClearArgs) -> Result<usize> {
    if !args.yes {
        bail!("refusing to clear the vault without --yes");
    }
    let mut vault = Vault::open(db).context("open vault")?;
    let removed = vault.row_count();
    vault.clear().context("clear vault")?;
    Ok(removed)
}

fn to_set(values: &[String]) -> BTreeSet<String> {
    values.iter().cloned().collect()
}
