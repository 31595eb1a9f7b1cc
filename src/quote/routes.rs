//! HTTP routes for quote draft sessions.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::pricing::models::MoveSummary;
use crate::pricing::responses::QuoteTotalsResponse;
use crate::AppState;

use super::draft::{apply, Customer, DraftAction, DraftContext, QuoteDraft};

/// Request to open a draft session
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateQuoteRequest {
    pub customer: Option<Customer>,
    pub summary: Option<MoveSummary>,
}

/// A draft together with its freshly computed totals
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote: QuoteDraft,
    pub totals: QuoteTotalsResponse,
}

impl QuoteResponse {
    fn new(draft: &QuoteDraft, currency: &str) -> Result<Self> {
        let breakdown = draft.breakdown()?;
        Ok(Self {
            quote: draft.clone(),
            totals: QuoteTotalsResponse::from_breakdown(&breakdown, currency),
        })
    }
}

/// Quote draft routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes", post(create_quote))
        .route("/api/quotes/:id", get(get_quote))
        .route("/api/quotes/:id/actions", post(apply_action))
}

async fn create_quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateQuoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuoteResponse>)> {
    let Json(req) = payload?;
    let now = Utc::now();
    let config = &state.config;
    let ctx = DraftContext {
        now,
        rates: &config.pricing,
        validity_days: config.quotes.validity_days,
    };

    let mut draft = state.quotes.open(now);
    if let Some(customer) = req.customer {
        draft = apply(&draft, DraftAction::SetCustomer { customer }, &ctx)?;
    }
    if let Some(summary) = req.summary {
        draft = apply(&draft, DraftAction::SetSummary { summary }, &ctx)?;
    }
    let draft = state.quotes.insert(draft).await;

    let response = QuoteResponse::new(&draft, &config.pricing.currency)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>> {
    let draft = state.quotes.get(id).await.ok_or(AppError::NotFound)?;
    Ok(Json(QuoteResponse::new(&draft, &state.config.pricing.currency)?))
}

async fn apply_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: std::result::Result<Json<DraftAction>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(action) = payload?;
    let config = &state.config;
    let ctx = DraftContext {
        now: Utc::now(),
        rates: &config.pricing,
        validity_days: config.quotes.validity_days,
    };

    let draft = state.quotes.apply(id, action, &ctx).await?;
    Ok(Json(QuoteResponse::new(&draft, &config.pricing.currency)?))
}
