//! Persistent historical vault for the visor de costos.
//!
//! Wraps two durable collections (canonical cost rows keyed by identity,
//! source-file metadata) behind transactional save/clear/load operations
//! on a local SQLite database, and keeps an in-memory mirror of the
//! canonical row set that is only ever updated after a transaction
//! commits. The merge engine lives here: importing a batch overwrites on
//! identity (last write wins) and reports inserted vs. updated counts.

mod db;
mod error;
mod snapshot;
mod vault;

pub use error::{Result, StoreError};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, export_snapshot, import_snapshot};
pub use vault::{MergeOutcome, Vault};
