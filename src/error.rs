//! Error handling for the application

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;
use crate::quote::DraftError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Quote not found")]
    NotFound,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

type ErrorParts = (StatusCode, &'static str, Option<serde_json::Value>);

fn pricing_error_parts(err: &PricingError) -> ErrorParts {
    match err {
        PricingError::Validation { field, .. } => (
            StatusCode::BAD_REQUEST,
            "validation_error",
            Some(json!({ "field": field })),
        ),
        PricingError::Computation(msg) => {
            tracing::error!("Computation error: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, "computation_error", None)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, details) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::Pricing(e) => pricing_error_parts(e),
            AppError::Draft(DraftError::Pricing(e)) => pricing_error_parts(e),
            AppError::Draft(DraftError::Finalized(_) | DraftError::NotFinalized(_)) => {
                (StatusCode::CONFLICT, "quote_state_conflict", None)
            }
            AppError::Draft(DraftError::ItemNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "item_not_found",
                Some(json!({ "id": id })),
            ),
            AppError::Draft(DraftError::DuplicateItem(id)) => (
                StatusCode::CONFLICT,
                "duplicate_item",
                Some(json!({ "id": id })),
            ),
            AppError::Draft(DraftError::Incomplete(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "incomplete_quote", None)
            }
            AppError::InvalidBody(rejection) => (rejection.status(), "invalid_body", None),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let message = match (&self, status) {
            (_, StatusCode::INTERNAL_SERVER_ERROR) => "Internal error".to_string(),
            (AppError::InvalidBody(rejection), _) => rejection.body_text(),
            _ => self.to_string(),
        };

        let body = PricingErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::from(PricingError::validation("items[0].quantity", "must be positive"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_computation_maps_to_server_error() {
        let err = AppError::from(PricingError::Computation("overflow".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_draft_errors_map_to_status() {
        let finalized = AppError::from(DraftError::Finalized("QT-2026-0001".to_string()));
        assert_eq!(finalized.into_response().status(), StatusCode::CONFLICT);

        let missing = AppError::from(DraftError::ItemNotFound("7".to_string()));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let invalid = PricingError::validation("discount.value", "too big");
        let nested = AppError::from(DraftError::Pricing(invalid));
        assert_eq!(nested.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
