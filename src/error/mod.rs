//! Unified error handling for HMS Core

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Application error types.
///
/// Each variant maps to exactly one HTTP status so the client can branch
/// on the failure kind. Validation failures carry the full aggregated
/// list of violations; everything else is a single message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a validation error for a single field
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldViolation {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(mut violations) => {
                violations.sort_by(|a, b| a.field.cmp(&b.field));
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "errors": violations })),
                )
                    .into_response()
            }
            AppError::RateLimited {
                message,
                retry_after_secs,
            } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "message": message })),
                )
                    .into_response();
                if let Ok(value) = retry_after_secs.to_string().parse() {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            AppError::Unauthenticated(message) => {
                message_response(StatusCode::UNAUTHORIZED, &message)
            }
            AppError::Forbidden(message) => message_response(StatusCode::FORBIDDEN, &message),
            AppError::NotFound(message) => message_response(StatusCode::NOT_FOUND, &message),
            AppError::Conflict(message) => message_response(StatusCode::CONFLICT, &message),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                message_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred",
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                message_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred",
                )
            }
        }
    }
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

// Conversion from validator's aggregated per-field errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldViolation {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::Validation(violations)
    }
}
