use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Notification channel kinds a saved search can ask for.
///
/// A kind with no registered sender is skipped at dispatch time, so new
/// kinds can appear in stored documents before a sender ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Push,
    Email,
    Webhook,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelKind::Push => "push",
            ChannelKind::Email => "email",
            ChannelKind::Webhook => "webhook",
        };
        f.write_str(s)
    }
}

/// Geographic/structural constraints. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub city: Option<String>,
    pub province: Option<String>,
    pub property_type: Option<String>,
    pub max_price: Option<f64>,
    pub min_beds: Option<i32>,
}

/// Financial thresholds. Absent fields impose no constraint; every present
/// field must be satisfied for the search to win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min_dscr: Option<f64>,
    pub min_coc: Option<f64>,
    pub require_non_negative_cf: Option<bool>,
    pub min_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyPrefs {
    #[serde(default)]
    pub channels: Vec<ChannelKind>,
}

/// A user-defined matching rule, created/edited by the user-facing surface.
/// This subsystem only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearch {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub name: String,

    #[serde(default)]
    pub filter: SearchFilter,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub notify: NotifyPrefs,

    pub is_active: bool,
    pub created_at: i64,
}
