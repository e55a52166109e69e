//! Storage contracts for the subsystem, plus the MongoDB implementations
//! used in production and in-memory ones so the business logic can be
//! exercised without infrastructure.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Alert, ListingSnapshot, SavedSearch, UwMetrics};

/// Read-side lookups owned by the ingest/underwriting collaborators.
/// Absence is a benign no-match, never an error.
#[async_trait]
pub trait ReadAdapter: Send + Sync {
    async fn get_listing(&self, id: &str) -> Result<Option<ListingSnapshot>, AppError>;
    async fn get_metrics(&self, result_id: &str) -> Result<Option<UwMetrics>, AppError>;
}

/// Saved searches are created elsewhere; this subsystem only lists them.
#[async_trait]
pub trait SavedSearchRepo: Send + Sync {
    async fn list(&self, active_only: bool) -> Result<Vec<SavedSearch>, AppError>;
}

/// Append-only alert audit log.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn append(&self, alert: Alert) -> Result<Alert, AppError>;
    async fn list(&self) -> Result<Vec<Alert>, AppError>;
}
