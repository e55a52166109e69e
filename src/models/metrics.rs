use serde::{Deserialize, Serialize};

/// Underwriting output for one valuation run. Opaque numeric facts from the
/// external underwriting step; keyed by the result id the event carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UwMetrics {
    #[serde(rename = "_id")]
    pub result_id: String,

    pub dscr: f64,
    pub cash_on_cash_pct: f64,
    pub cash_flow_annual: f64,

    pub cap_rate_pct: Option<f64>,
    pub irr_pct: Option<f64>,
}
