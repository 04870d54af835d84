//! Read-side projection over the canonical row set.
//!
//! Pure functions: a filter set that narrows rows by year, month,
//! functional unit and free-text cost-center search, and aggregation
//! summaries (totals, monthly series, cost-center rollups, sos
//! statistics). Nothing here touches storage.

mod aggregate;
mod filter;

pub use aggregate::{
    CentroSummary, MonthSummary, SosStats, Totals, by_centro, by_month, sos_stats, totals, years,
};
pub use filter::FilterSet;
