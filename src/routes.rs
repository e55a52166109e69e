use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use mongodb::bson::doc;

use crate::{AppState, push};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/db", get(health_db))
        .route("/alerts", get(list_alerts))
        .route("/alerts/stream", get(push::sse_alerts))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn health_db(State(state): State<AppState>) -> Response {
    match state.db.run_command(doc! { "ping": 1 }, None).await {
        Ok(_) => (StatusCode::OK, "ok").into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("db error: {e}"),
        )
            .into_response(),
    }
}

// GET /alerts — audit/history surface over the append-only store.
async fn list_alerts(State(state): State<AppState>) -> Response {
    match state.alerts.list().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("db error: {e}"),
        )
            .into_response(),
    }
}
