use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

/// Every failure a handler can surface. Rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("username already exists")]
    DuplicateIdentity,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session identity no longer resolves to a user.
    #[error("session user not found")]
    UserNotFound,

    /// No session cookie on the request.
    #[error("missing session")]
    Unauthorized,

    /// Session cookie present but the token did not verify.
    #[error("invalid session token")]
    InvalidToken,

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("weather provider failed with {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => {
                tracing::debug!(%msg, "validation error");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::DuplicateIdentity => {
                (StatusCode::BAD_REQUEST, "Username already exists".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
            }
            AppError::UserNotFound => (StatusCode::BAD_REQUEST, "Login required".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Upstream { status, message } => {
                tracing::warn!(%status, %message, "weather provider error");
                (status, message)
            }
            AppError::Store(ref e) => {
                tracing::error!(error = %e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!(error = ?e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
