use std::collections::BTreeSet;

use costos_model::CostRow;
use costos_model::text::normalize_for_match;

/// Row filter: set membership on the categorical fields plus a free-text
/// search over the cost-center name and code.
///
/// Empty sets and an empty query mean "no restriction". The free-text
/// query is accent- and case-insensitive on both sides, so "farmacia"
/// finds "FARMACIA" and "logistica" finds "Logística".
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub vigencias: BTreeSet<String>,
    pub meses: BTreeSet<String>,
    pub ufs: BTreeSet<String>,
    pub query: Option<String>,
}

impl FilterSet {
    pub fn is_unrestricted(&self) -> bool {
        self.vigencias.is_empty()
            && self.meses.is_empty()
            && self.ufs.is_empty()
            && self.query.as_deref().is_none_or(str::is_empty)
    }

    pub fn matches(&self, row: &CostRow) -> bool {
        if !self.vigencias.is_empty() && !self.vigencias.contains(&row.vigencia) {
            return false;
        }
        if !self.meses.is_empty() && !self.meses.contains(&row.mes) {
            return false;
        }
        if !self.ufs.is_empty() && !self.ufs.contains(&row.uf) {
            return false;
        }
        match self.query.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let needle = normalize_for_match(query);
                normalize_for_match(&row.centro).contains(&needle)
                    || normalize_for_match(&row.cc).contains(&needle)
            }
        }
    }

    /// Narrow a row iterator to the rows this filter accepts.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<&'a CostRow>
    where
        I: IntoIterator<Item = &'a CostRow>,
    {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}
