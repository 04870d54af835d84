//! Text and number normalization shared by parsers, filters, and identity.
//!
//! All fuzzy/structural matching in this workspace (column-header lookup,
//! report-type sniffing, cost-center filtering) goes through
//! [`normalize_for_match`] so it is accent- and case-insensitive everywhere.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::row::MONTHS;

/// Remove diacritical marks via NFD decomposition.
///
/// Total function: any input yields a valid output.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Accent-stripped, lowercased form used for all structural text matching.
pub fn normalize_for_match(text: &str) -> String {
    strip_accents(text).to_lowercase()
}

/// Coerce arbitrary cell text to a number, falling back to zero.
///
/// Deliberately lossy: these values feed sums, where a missing or
/// malformed cell must not poison sibling rows through null propagation.
pub fn to_number(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// Canonicalize a month label against the fixed Spanish month list.
///
/// Matching is accent/case-insensitive on the first three characters
/// ("Ene", "enero", "ENE" all resolve to "enero"). When nothing matches,
/// the trimmed lowercased input is returned unchanged; callers must treat
/// such output as "not a valid month" and exclude the row.
pub fn canonicalize_month(raw: &str) -> String {
    let normalized = normalize_for_match(raw.trim());
    for name in MONTHS {
        if normalized == name || normalized.starts_with(&name[..3]) {
            return (*name).to_string();
        }
    }
    raw.trim().to_lowercase()
}
