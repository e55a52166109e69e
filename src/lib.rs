//! Library entrypoint for dealwatch.
//!
//! This file exists mainly to make integration tests easy (tests under
//! `tests/` can import the app state, routes, bus, matching engine, and
//! services).

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod matching;
pub mod models;
pub mod push;
pub mod repos;
pub mod routes;
pub mod services;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub push: push::PushRegistry,
    pub alerts: Arc<dyn repos::AlertStore>,
}
