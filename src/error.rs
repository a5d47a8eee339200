use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

/// Confirmation flow errors.
///
/// Everything here is reported to the caller as a value; no operation in
/// this crate is fatal to the process.
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid confirmation token")]
    TokenMismatch,

    #[error("Account already confirmed")]
    AlreadyConfirmed,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Failed to send confirmation email: {0}")]
    NotificationFailed(String),

    #[error("Internal error")]
    Internal(String),

    #[error("store error: {0}")]
    Store(String),
}

impl ConfirmError {
    /// Wrap a store error, erasing the concrete error type.
    pub fn from_store<E: std::error::Error>(err: E) -> Self {
        Self::Store(err.to_string())
    }
}

/// Error payload returned by all confirmation endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for ConfirmError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ConfirmError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ConfirmError::TokenMismatch => (StatusCode::UNAUTHORIZED, self.to_string()),
            ConfirmError::AlreadyConfirmed => (StatusCode::CONFLICT, self.to_string()),
            ConfirmError::InvalidEmail => (StatusCode::BAD_REQUEST, self.to_string()),
            ConfirmError::NotificationFailed(ref msg) => {
                tracing::error!("Notification error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to send confirmation email".to_string(),
                )
            }
            ConfirmError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ConfirmError::Store(ref msg) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
