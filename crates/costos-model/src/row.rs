use crate::ids::RowKey;

/// Sentinel functional-unit label for rows without that subdivision.
pub const SIN_UF: &str = "Sin UF";

/// Canonical lowercase Spanish month names, calendar order.
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Calendar position of a canonical month name, for chronological sorting.
pub fn month_index(mes: &str) -> Option<usize> {
    MONTHS.iter().position(|m| *m == mes)
}

/// One monthly cost record for one cost center.
///
/// Aggregable numeric fields coerce to zero when the source cell is
/// missing or malformed. The `sos` ratio is the exception: it stays `None`
/// so that averages can exclude it instead of skewing toward zero.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CostRow {
    /// Fiscal year, four digits.
    pub vigencia: String,
    /// Canonical lowercase month name.
    pub mes: String,
    /// Functional-unit label; [`SIN_UF`] when the layout has none.
    pub uf: String,
    /// Cost-center numeric code as text; may be empty.
    pub cc: String,
    /// Cost-center display name.
    pub centro: String,
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
    /// Sustainability ratio; `None` when absent or unparseable.
    pub sos: Option<f64>,
    /// Derived identity; assigned at parse time or backfilled on merge.
    #[serde(default)]
    pub id: Option<RowKey>,
    /// Originating filename for the current session. Provenance only,
    /// never part of identity and never persisted.
    #[serde(skip)]
    pub source: Option<String>,
}

impl CostRow {
    /// Derive this row's composite identity from its identity fields.
    pub fn derive_key(&self) -> RowKey {
        RowKey::derive(&self.vigencia, &self.mes, &self.cc, &self.centro, &self.uf)
    }

    /// Assign the derived identity if the row does not carry one yet.
    pub fn ensure_id(&mut self) -> &RowKey {
        if self.id.is_none() {
            self.id = Some(self.derive_key());
        }
        match self.id.as_ref() {
            Some(key) => key,
            None => unreachable!("id assigned above"),
        }
    }
}

impl Default for CostRow {
    fn default() -> Self {
        Self {
            vigencia: String::new(),
            mes: String::new(),
            uf: SIN_UF.to_string(),
            cc: String::new(),
            centro: String::new(),
            gastos_generales: 0.0,
            mano_obra: 0.0,
            activos_fijos: 0.0,
            dispensacion: 0.0,
            consumo: 0.0,
            directos: 0.0,
            indirectos: 0.0,
            costo_total: 0.0,
            facturado: 0.0,
            utilidad: 0.0,
            sos: None,
            id: None,
            source: None,
        }
    }
}
