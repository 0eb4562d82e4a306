use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::criteria::ValidationIssue;
use crate::document::DocumentError;
use crate::mail::MailError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Submission is incomplete ({} issues)", .0.len())]
    InvalidSubmission(Vec<ValidationIssue>),

    #[error("SMTP configuration missing")]
    MailNotConfigured,

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

// Extractor rejections become 400 JSON bodies instead of axum's plain-text replies.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidSubmission(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_SUBMISSION",
                self.to_string(),
            ),
            AppError::MailNotConfigured => {
                tracing::error!("mail relay called without SMTP configuration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MAIL_NOT_CONFIGURED",
                    self.to_string(),
                )
            }
            AppError::Mail(e) => {
                tracing::error!("Mail error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MAIL_ERROR",
                    "Failed to send email".to_string(),
                )
            }
            AppError::Document(e) => {
                tracing::error!("Document error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "DOCUMENT_ERROR", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let AppError::InvalidSubmission(issues) = &self {
            body["issues"] = issues
                .iter()
                .map(|issue| {
                    let mut entry = json!(issue);
                    entry["message"] = issue.to_string().into();
                    entry
                })
                .collect::<Vec<Value>>()
                .into();
        }

        (status, Json(body)).into_response()
    }
}
