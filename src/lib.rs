//! Pricing back end for the moving quote wizard.
//!
//! The pricing engine (`pricing`) is pure and synchronous; `quote` threads an
//! immutable draft through user actions; the rest wires both into an axum
//! service.

pub mod config;
pub mod error;
pub mod pricing;
pub mod quote;
pub mod telemetry;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::quote::QuoteStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub quotes: QuoteStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let quotes = QuoteStore::new(&config.quotes);
        Self {
            config: Arc::new(config),
            quotes,
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(pricing::router())
        .merge(quote::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "drafts": state.quotes.stats().await,
    }))
}
