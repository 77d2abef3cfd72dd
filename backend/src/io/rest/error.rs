//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::errors::{DomainError, FeeError};

/// Status code and error code for a failure, looking through any context
/// layers for a domain error
pub fn classify(e: &anyhow::Error) -> (StatusCode, &'static str) {
    for cause in e.chain() {
        if let Some(domain) = cause.downcast_ref::<DomainError>() {
            return match domain {
                DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                DomainError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            };
        }
        if let Some(fee) = cause.downcast_ref::<FeeError>() {
            return match fee {
                FeeError::NonPositiveAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
                FeeError::UnknownFee { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_FEE"),
                FeeError::NotApplicable { .. } => (StatusCode::BAD_REQUEST, "FEE_NOT_APPLICABLE"),
                FeeError::Overpayment { .. } => (StatusCode::BAD_REQUEST, "OVERPAYMENT"),
                FeeError::NothingPending(_) => (StatusCode::CONFLICT, "NOTHING_PENDING"),
                FeeError::CompulsoryFee(_) => (StatusCode::BAD_REQUEST, "COMPULSORY_FEE"),
                FeeError::PartialPayment { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "PARTIAL_PAYMENT"),
            };
        }
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
}

/// Log the failure and build the JSON error body. The underlying message is
/// passed through to the caller.
pub fn error_response(action: &str, e: anyhow::Error) -> Response {
    let (status, code) = classify(&e);
    if status.is_server_error() {
        error!("Failed to {}: {:?}", action, e);
    } else {
        error!("Failed to {}: {}", action, e);
    }

    let body = ErrorResponse {
        error: format!("{:#}", e),
        code: code.to_string(),
    };
    (status, Json(body)).into_response()
}
