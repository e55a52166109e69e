//! In-memory implementations. Single-writer by design: fine for tests and
//! a single consumer loop, not meant to be shared across concurrent
//! writers without external synchronization.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{AlertStore, ReadAdapter, SavedSearchRepo};
use crate::error::AppError;
use crate::models::{Alert, ListingSnapshot, SavedSearch, UwMetrics};

#[derive(Default)]
pub struct MemoryReadAdapter {
    listings: HashMap<String, ListingSnapshot>,
    metrics: HashMap<String, UwMetrics>,
}

impl MemoryReadAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_listing(&mut self, listing: ListingSnapshot) {
        self.listings.insert(listing.id.clone(), listing);
    }

    pub fn insert_metrics(&mut self, metrics: UwMetrics) {
        self.metrics.insert(metrics.result_id.clone(), metrics);
    }
}

#[async_trait]
impl ReadAdapter for MemoryReadAdapter {
    async fn get_listing(&self, id: &str) -> Result<Option<ListingSnapshot>, AppError> {
        Ok(self.listings.get(id).cloned())
    }

    async fn get_metrics(&self, result_id: &str) -> Result<Option<UwMetrics>, AppError> {
        Ok(self.metrics.get(result_id).cloned())
    }
}

pub struct MemorySavedSearchRepo {
    searches: Vec<SavedSearch>,
}

impl MemorySavedSearchRepo {
    pub fn new(searches: Vec<SavedSearch>) -> Self {
        Self { searches }
    }
}

#[async_trait]
impl SavedSearchRepo for MemorySavedSearchRepo {
    async fn list(&self, active_only: bool) -> Result<Vec<SavedSearch>, AppError> {
        let items = self
            .searches
            .iter()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect();
        Ok(items)
    }
}

#[derive(Default)]
pub struct MemoryAlertStore {
    items: Mutex<Vec<Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn append(&self, alert: Alert) -> Result<Alert, AppError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.push(alert.clone());
        Ok(alert)
    }

    async fn list(&self) -> Result<Vec<Alert>, AppError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.clone())
    }
}
