//! Error types and Axum response conversions.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error types.
///
/// The first six variants are the rejection reasons of the authentication
/// gate and map 1:1 to client-visible responses. `Internal` covers faults in
/// the verification machinery and the quote store.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing headers")]
    MissingHeaders,

    #[error("Invalid timestamp")]
    InvalidTimestamp,

    #[error("Ref not unique")]
    ReplayedNonce,

    #[error("Invalid token")]
    MalformedToken,

    #[error("Invalid JSON body")]
    MalformedBody,

    #[error("Invalid signature")]
    SignatureMismatch,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Internal(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::SignatureMismatch => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::MissingHeaders
            | AppError::InvalidTimestamp
            | AppError::ReplayedNonce
            | AppError::MalformedToken
            | AppError::MalformedBody => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// Convenience conversions from common error types
impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Internal(format!("SQLite error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}
