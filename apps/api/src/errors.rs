use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extractor::ExtractError;
use crate::llm_client::ServiceError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// A reply that does not parse as a structured report is not an error; it is
/// returned as `Evaluation::RawText`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing input the user has to supply before anything runs.
    #[error("{0}")]
    Precondition(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload too large: {0}")]
    UploadTooLarge(String),

    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("Document format error: {0}")]
    DocumentFormat(#[from] ExtractError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::UploadTooLarge(e.body_text())
        } else {
            AppError::Validation(format!("malformed multipart form: {}", e.body_text()))
        }
    }
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Precondition(_) => "PRECONDITION_FAILED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UploadTooLarge(_) => "UPLOAD_TOO_LARGE",
            AppError::UnsupportedDocument(_) => "UNSUPPORTED_DOCUMENT",
            AppError::DocumentFormat(_) => "DOCUMENT_FORMAT_ERROR",
            AppError::Service(_) => "SERVICE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Precondition(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UploadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::UnsupportedDocument(msg) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, msg.clone()),
            AppError::DocumentFormat(e) => {
                tracing::warn!("Unreadable upload: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The uploaded file could not be read as a PDF. Please upload a valid PDF resume."
                        .to_string(),
                )
            }
            AppError::Service(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "The AI evaluation service could not complete the request".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
