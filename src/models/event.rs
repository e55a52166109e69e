use serde::{Deserialize, Serialize};

/// A fact that a valuation finished for a listing. `id` is the listing id,
/// `result_id` points at the stored underwriting output.
///
/// `kind` is the wire field `type` ("underwrite_completed" or
/// "property_scored"); both take the same handling path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEvent {
    pub id: String,
    pub result_id: String,

    pub score: Option<f64>,
    pub source: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub ts: Option<i64>,
}
