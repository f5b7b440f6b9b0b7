//! Error types for the Van-Niti server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::assist::AssistError;
use crate::ocr::OcrError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// A single failed field check, addressed by dotted path (`holder.name`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{message}")]
    Duplicate {
        message: String,
        field: Option<&'static str>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Assistant error: {0}")]
    Assist(#[from] AssistError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Translate a unique-constraint violation into a duplicate error,
    /// passing every other database error through.
    pub fn on_unique_violation(
        err: sqlx::Error,
        message: &str,
        field: Option<&'static str>,
    ) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Duplicate {
                message: message.to_string(),
                field,
            },
            _ => AppError::Database(err),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = None;
        let mut field = None;
        let mut details = None;

        let (status, error_type, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Validation(list) => {
                errors = Some(list);
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "Validation Error".to_string(),
                )
            }
            AppError::Duplicate { message, field: f } => {
                field = f;
                (StatusCode::BAD_REQUEST, "duplicate", message)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                details = debug_details(msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Server error".to_string(),
                )
            }
            AppError::Ocr(e) => {
                let status = e.status_code();
                if status.is_server_error() {
                    tracing::error!("OCR processing error: {}", e);
                    details = Some(e.to_string());
                    (status, "OCR processing failed", "OCR processing failed".to_string())
                } else {
                    (status, "bad_request", e.to_string())
                }
            }
            AppError::Assist(e) => {
                tracing::error!("Assistant error: {}", e);
                details = debug_details(e.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process OCR result",
                    "Failed to process OCR result".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                details = debug_details(e.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Server error".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                details = debug_details(e.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "serialization_error",
                    "Server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: error_type,
            message,
            errors,
            field,
            details,
        });

        (status, body).into_response()
    }
}

fn debug_details(detail: String) -> Option<String> {
    if cfg!(debug_assertions) {
        Some(detail)
    } else {
        None
    }
}
