use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::RepoError;

/// Transport-level error. Every variant renders as a single-key
/// `{"error": ...}` JSON body with the matching status code.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    /// Request body did not decode as the resource's wire shape.
    InvalidPayload,
    /// The `page` query parameter was present but not an integer.
    PageParam,
    /// The `id` path parameter was not a valid UUID.
    InvalidId,
    /// The requested record is absent or soft-deleted.
    NotFound(String),
    /// Storage failure; the message is the backend's own.
    Internal(String),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match err {
            RepoError::NotFound { .. } => Self::NotFound(message),
            RepoError::Storage { .. } => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidPayload => {
                (StatusCode::BAD_REQUEST, "Invalid request payload".to_string())
            }
            Self::PageParam => (
                StatusCode::BAD_REQUEST,
                "page param is not a number".to_string(),
            ),
            Self::InvalidId => (StatusCode::BAD_REQUEST, "invalid id path param".to_string()),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
