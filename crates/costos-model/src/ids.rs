use std::fmt;

use crate::ModelError;
use crate::row::SIN_UF;

/// Separator between the identity components of a [`RowKey`].
pub const KEY_SEPARATOR: &str = "||";

/// Derived composite identity of a cost row.
///
/// Two rows with the same key are the same fact regardless of when or how
/// they were imported; the merge engine overwrites on key equality.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    /// Derive the key from the identity fields.
    ///
    /// Deterministic and case-insensitive: components are joined with
    /// [`KEY_SEPARATOR`] and lowercased as a whole. An empty functional
    /// unit collapses to the "Sin UF" sentinel so that rows imported with
    /// and without the field agree on identity.
    pub fn derive(vigencia: &str, mes: &str, cc: &str, centro: &str, uf: &str) -> Self {
        let uf = if uf.is_empty() { SIN_UF } else { uf };
        let joined = [vigencia, mes, cc, centro, uf].join(KEY_SEPARATOR);
        Self(joined.to_lowercase())
    }

    /// Wrap a key that already exists (e.g. read back from storage).
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ModelError::InvalidRowKey(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
