//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// No valid session was presented.
    Unauthorized,
    /// The session lacks the required role.
    Forbidden,
    /// Checkout flow error.
    Checkout(CheckoutError),
    /// Data store error.
    Store(StoreError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)),
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, error_body("authentication required"))
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, error_body("admin access required")),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Store(err) => store_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, error_body(msg))
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

fn error_body(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, serde_json::Value) {
    match &err {
        CheckoutError::Validation(_) | CheckoutError::SignatureMismatch(_) => {
            (StatusCode::BAD_REQUEST, error_body(err.to_string()))
        }
        CheckoutError::OrderNotFound(_) => (StatusCode::NOT_FOUND, error_body(err.to_string())),
        CheckoutError::InvalidTransition { .. } | CheckoutError::NotAwaitingPayment(_) => {
            (StatusCode::CONFLICT, error_body(err.to_string()))
        }
        // The order exists and can be retried; hand its id back so the
        // client retries against the same order instead of re-placing it.
        CheckoutError::Gateway { order_id, .. } => (
            StatusCode::BAD_GATEWAY,
            serde_json::json!({
                "error": "payment gateway unavailable, retry payment",
                "order_id": order_id.to_string(),
            }),
        ),
        CheckoutError::Store(store_err) => store_error_to_response_ref(store_err, &err),
    }
}

fn store_error_to_response(err: StoreError) -> (StatusCode, serde_json::Value) {
    match &err {
        StoreError::Duplicate { .. } => (StatusCode::CONFLICT, error_body(err.to_string())),
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, error_body(err.to_string())),
        _ => {
            tracing::error!(error = %err, "store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("internal error"),
            )
        }
    }
}

fn store_error_to_response_ref(
    err: &StoreError,
    outer: &CheckoutError,
) -> (StatusCode, serde_json::Value) {
    match err {
        StoreError::Duplicate { .. } => (StatusCode::CONFLICT, error_body(outer.to_string())),
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, error_body(outer.to_string())),
        _ => {
            tracing::error!(error = %outer, "store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("internal error"),
            )
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
