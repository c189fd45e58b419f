use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::extraction::text::ExtractError;
use crate::notify::NotifyError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Empty submission: {0}")]
    EmptySubmission(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    StorageFailure(String),

    #[error("Notification error: {0}")]
    Notification(#[from] NotifyError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::EmptySubmission(msg) => {
                (StatusCode::BAD_REQUEST, "EMPTY_SUBMISSION", msg.clone())
            }
            AppError::Extraction(e @ ExtractError::UnsupportedFormat(_)) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", e.to_string())
            }
            AppError::Extraction(e @ ExtractError::ParseFailure(_)) => {
                tracing::warn!("Document parse failure: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PARSE_FAILURE",
                    "Error parsing file.".to_string(),
                )
            }
            AppError::StorageFailure(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_FAILURE",
                    "Error saving file.".to_string(),
                )
            }
            AppError::Notification(e) => {
                tracing::error!("Notification error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "NOTIFICATION_FAILURE",
                    format!("Failed to send email: {e}"),
                )
            }
            AppError::Export(e @ ExportError::NoResults) => {
                (StatusCode::BAD_REQUEST, "EXPORT_FAILURE", e.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILURE",
                    format!("Failed to export results: {e}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
