//! Aggregation summaries over filtered rows.

use std::collections::BTreeMap;

use costos_model::{CostRow, month_index};

/// Sums of the aggregable numeric fields over a set of rows.
///
/// `sos` never participates here: ratios are not additive, and null
/// ratios must not drag averages toward zero. See [`sos_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub rows: usize,
    pub gastos_generales: f64,
    pub mano_obra: f64,
    pub activos_fijos: f64,
    pub dispensacion: f64,
    pub consumo: f64,
    pub directos: f64,
    pub indirectos: f64,
    pub costo_total: f64,
    pub facturado: f64,
    pub utilidad: f64,
}

impl Totals {
    fn accumulate(&mut self, row: &CostRow) {
        self.rows += 1;
        self.gastos_generales += row.gastos_generales;
        self.mano_obra += row.mano_obra;
        self.activos_fijos += row.activos_fijos;
        self.dispensacion += row.dispensacion;
        self.consumo += row.consumo;
        self.directos += row.directos;
        self.indirectos += row.indirectos;
        self.costo_total += row.costo_total;
        self.facturado += row.facturado;
        self.utilidad += row.utilidad;
    }
}

pub fn totals<'a, I>(rows: I) -> Totals
where
    I: IntoIterator<Item = &'a CostRow>,
{
    let mut acc = Totals::default();
    for row in rows {
        acc.accumulate(row);
    }
    acc
}

/// One month's slice of the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub mes: String,
    pub totals: Totals,
}

/// Group rows by canonical month, ordered by calendar position.
///
/// Months that are not canonical (fallback spellings from odd source
/// cells) sort after the twelve known months, alphabetically.
pub fn by_month<'a, I>(rows: I) -> Vec<MonthSummary>
where
    I: IntoIterator<Item = &'a CostRow>,
{
    let mut groups: BTreeMap<(usize, String), Totals> = BTreeMap::new();
    for row in rows {
        let position = month_index(&row.mes).unwrap_or(usize::MAX);
        groups
            .entry((position, row.mes.clone()))
            .or_default()
            .accumulate(row);
    }
    groups
        .into_iter()
        .map(|((_, mes), totals)| MonthSummary { mes, totals })
        .collect()
}

/// One cost center's rollup across the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CentroSummary {
    pub cc: String,
    pub centro: String,
    pub totals: Totals,
    /// Mean sos across the group's rows that carry one; `None` when no
    /// row does.
    pub sos_avg: Option<f64>,
}

/// Group rows by cost center (code + name), largest total cost first.
pub fn by_centro<'a, I>(rows: I) -> Vec<CentroSummary>
where
    I: IntoIterator<Item = &'a CostRow>,
{
    let mut groups: BTreeMap<(String, String), (Totals, Vec<f64>)> = BTreeMap::new();
    for row in rows {
        let entry = groups
            .entry((row.cc.clone(), row.centro.clone()))
            .or_default();
        entry.0.accumulate(row);
        if let Some(sos) = row.sos {
            entry.1.push(sos);
        }
    }
    let mut summaries: Vec<CentroSummary> = groups
        .into_iter()
        .map(|((cc, centro), (totals, sos_values))| CentroSummary {
            cc,
            centro,
            totals,
            sos_avg: mean(&sos_values),
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.totals
            .costo_total
            .total_cmp(&a.totals.costo_total)
            .then_with(|| a.centro.cmp(&b.centro))
    });
    summaries
}

/// Min / mean / max of the sos ratio over rows that carry one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SosStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    /// Rows that contributed; rows with a null sos are excluded, not
    /// counted as zero.
    pub count: usize,
}

pub fn sos_stats<'a, I>(rows: I) -> Option<SosStats>
where
    I: IntoIterator<Item = &'a CostRow>,
{
    let values: Vec<f64> = rows.into_iter().filter_map(|row| row.sos).collect();
    let avg = mean(&values)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(SosStats {
        min,
        avg,
        max,
        count: values.len(),
    })
}

/// Distinct fiscal years present, sorted ascending.
pub fn years<'a, I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CostRow>,
{
    let set: std::collections::BTreeSet<String> = rows
        .into_iter()
        .filter(|row| !row.vigencia.is_empty())
        .map(|row| row.vigencia.clone())
        .collect();
    set.into_iter().collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
