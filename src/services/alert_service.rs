use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::dispatch::Dispatcher;
use crate::error::AppError;
use crate::matching;
use crate::models::{Alert, AlertPayload, Delivery, SavedSearch, ValuationEvent};
use crate::repos::{AlertStore, ReadAdapter, SavedSearchRepo};

/// Orchestrates one valuation event: fetch context, match, persist,
/// dispatch. Persist and dispatch are not transactional; a persisted alert
/// whose dispatch fails stays persisted, and retry is the channel's
/// business.
pub struct AlertService {
    reads: Arc<dyn ReadAdapter>,
    searches: Arc<dyn SavedSearchRepo>,
    alerts: Arc<dyn AlertStore>,
    dispatcher: Dispatcher,
}

impl AlertService {
    pub fn new(
        reads: Arc<dyn ReadAdapter>,
        searches: Arc<dyn SavedSearchRepo>,
        alerts: Arc<dyn AlertStore>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            reads,
            searches,
            alerts,
            dispatcher,
        }
    }

    /// Handles `underwrite_completed`; `property_scored` events take the
    /// same path (their score feeds min-score rules).
    pub async fn handle_underwrite_completed(
        &self,
        event: &ValuationEvent,
    ) -> Result<(), AppError> {
        let Some(listing) = self.reads.get_listing(&event.id).await? else {
            tracing::info!(listing_id = %event.id, "listing not found, skipping event");
            return Ok(());
        };

        // Metrics may legitimately be absent; score-only rules still match.
        let metrics = self.reads.get_metrics(&event.result_id).await?;

        let searches = self.searches.list(true).await?;
        let by_id: HashMap<ObjectId, &SavedSearch> =
            searches.iter().map(|s| (s.id, s)).collect();

        let winners = matching::match_searches(&listing, &searches, metrics.as_ref(), event.score);
        if winners.is_empty() {
            return Ok(());
        }

        let now = Utc::now().timestamp();

        for winner in winners {
            let channels = by_id
                .get(&winner.search_id)
                .map(|s| s.notify.channels.clone())
                .unwrap_or_default();

            let alert = Alert {
                id: ObjectId::new(),
                user_id: winner.user_id,
                saved_search_id: winner.search_id,
                listing_id: listing.id.clone(),
                result_id: event.result_id.clone(),
                payload: AlertPayload {
                    snapshot: listing.clone(),
                    metrics: metrics.clone(),
                    score: event.score,
                    matched: winner.matched,
                },
                delivery: Delivery { channels },
                triggered_at: now,
            };

            let stored = self.alerts.append(alert).await?;

            tracing::info!(
                alert_id = %stored.id,
                saved_search_id = %stored.saved_search_id,
                listing_id = %stored.listing_id,
                "alert triggered"
            );

            self.dispatcher.dispatch(&stored).await;
        }

        Ok(())
    }
}
