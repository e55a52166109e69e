use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{ChannelKind, ListingSnapshot, UwMetrics};

/// Everything the notification renders from: the snapshot and metrics as
/// they were at trigger time, plus the satisfied-criterion tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPayload {
    pub snapshot: ListingSnapshot,
    pub metrics: Option<UwMetrics>,
    pub score: Option<f64>,

    // e.g. ["dscr>=1.2", "coc>=0.08", "cf>=0"], fixed order
    pub matched: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub channels: Vec<ChannelKind>,
}

/// Append-only audit record, one per (event, winning saved search).
/// Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub saved_search_id: ObjectId,

    pub listing_id: String,
    pub result_id: String,

    pub payload: AlertPayload,
    pub delivery: Delivery,

    pub triggered_at: i64,
}
