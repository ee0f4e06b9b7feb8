use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP callers.
///
/// Storage failures never reach this type; they degrade to synthetic data
/// inside the aggregator.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidParameters(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidParameters(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidParameters(detail) => {
                tracing::warn!("Invalid parameters: {}", detail);
                (StatusCode::BAD_REQUEST, "Invalid parameters")
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
