use serde::{Deserialize, Serialize};

/// Immutable point-in-time view of a listing, produced by the ingest side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    #[serde(rename = "_id")]
    pub id: String,

    pub city: String,
    pub province: String,
    pub property_type: String,

    pub beds: i32,
    pub baths: f64,
    pub price: f64,
}
