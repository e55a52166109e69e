use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::Database;
use mongodb::bson::doc;
use mongodb::options::FindOptions;

use super::{AlertStore, ReadAdapter, SavedSearchRepo};
use crate::error::AppError;
use crate::models::{Alert, ListingSnapshot, SavedSearch, UwMetrics};

#[derive(Clone)]
pub struct MongoReadAdapter {
    db: Database,
}

impl MongoReadAdapter {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadAdapter for MongoReadAdapter {
    async fn get_listing(&self, id: &str) -> Result<Option<ListingSnapshot>, AppError> {
        let col = self.db.collection::<ListingSnapshot>("listings");
        let found = col.find_one(doc! { "_id": id }, None).await?;
        Ok(found)
    }

    async fn get_metrics(&self, result_id: &str) -> Result<Option<UwMetrics>, AppError> {
        let col = self.db.collection::<UwMetrics>("uw_results");
        let found = col.find_one(doc! { "_id": result_id }, None).await?;
        Ok(found)
    }
}

#[derive(Clone)]
pub struct MongoSavedSearchRepo {
    db: Database,
}

impl MongoSavedSearchRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SavedSearchRepo for MongoSavedSearchRepo {
    async fn list(&self, active_only: bool) -> Result<Vec<SavedSearch>, AppError> {
        let col = self.db.collection::<SavedSearch>("saved_searches");

        let filter = if active_only {
            doc! { "is_active": true }
        } else {
            doc! {}
        };

        let mut cursor = col.find(filter, None).await?;
        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        Ok(items)
    }
}

#[derive(Clone)]
pub struct MongoAlertStore {
    db: Database,
}

impl MongoAlertStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertStore for MongoAlertStore {
    async fn append(&self, alert: Alert) -> Result<Alert, AppError> {
        let col = self.db.collection::<Alert>("alerts");
        col.insert_one(&alert, None).await?;
        Ok(alert)
    }

    async fn list(&self) -> Result<Vec<Alert>, AppError> {
        let col = self.db.collection::<Alert>("alerts");

        let find_opts = FindOptions::builder()
            .sort(doc! { "triggered_at": -1 })
            .build();

        let mut cursor = col.find(doc! {}, find_opts).await?;
        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        Ok(items)
    }
}
