//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tunekit::{ServiceError, TunekitError};

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from client.
    BadRequest(String),
    /// Internal server error.
    Internal(String),
    /// Error from the tunekit library.
    Tunekit(TunekitError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

fn status_for(err: &TunekitError) -> (StatusCode, &'static str) {
    if let Some(service) = err.service_error() {
        return match service {
            ServiceError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            ServiceError::PaymentRequired => (StatusCode::PAYMENT_REQUIRED, "payment_required"),
            _ => (StatusCode::BAD_GATEWAY, "service_error"),
        };
    }
    match err {
        TunekitError::NoData(_) => (StatusCode::BAD_REQUEST, "no_data"),
        TunekitError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        TunekitError::UnknownItem(_) => (StatusCode::NOT_FOUND, "not_found"),
        TunekitError::BatchInProgress => (StatusCode::CONFLICT, "batch_in_progress"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, hint) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg, None),
            ApiError::Tunekit(e) => {
                let (status, error) = status_for(&e);
                let hint = match e.user_hint() {
                    "Unknown error." => None,
                    hint => Some(hint.to_string()),
                };
                (status, error, e.to_string(), hint)
            }
        };

        if status.is_server_error() {
            tracing::warn!(%status, %message, "request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                hint,
            }),
        )
            .into_response()
    }
}

impl From<TunekitError> for ApiError {
    fn from(err: TunekitError) -> Self {
        ApiError::Tunekit(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Worker task failed: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Tunekit(e) => write!(f, "Tunekit error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
