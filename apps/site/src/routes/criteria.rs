use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::criteria::{validate_all, CriteriaSubmission};
use crate::document::PDF_CONTENT_TYPE;
use crate::errors::AppError;
use crate::locale::Locale;
use crate::mail::{compose_criteria_mail, MailAttachment};
use crate::state::AppState;
use crate::submission::DOCUMENT_FILE_NAME;

/// Upper bound for an uploaded criteria document.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// POST /api/criteria
/// Relays the first file field of the multipart body as a mail attachment.
pub async fn handle_criteria_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let mut multipart = multipart?;
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .filter(|(_, bytes)| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("Uploaded file must be a PDF".to_string()));
    }
    let mailer = state.mailer()?;

    let file_name = if file_name.trim().is_empty() {
        DOCUMENT_FILE_NAME.to_string()
    } else {
        file_name
    };
    let reference = Uuid::new_v4();
    let size = bytes.len();
    let mail = compose_criteria_mail(
        MailAttachment {
            file_name,
            content_type: PDF_CONTENT_TYPE.to_string(),
            bytes,
        },
        &mailer.recipients.criteria,
        reference,
        Utc::now(),
    );
    mailer.relay.send(mail).await?;
    info!(%reference, size, "criteria document relayed");

    Ok(Json(json!({
        "message": "Email sent successfully",
        "reference": reference,
    })))
}

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub locale: Option<String>,
}

/// POST /api/criteria/document
/// Validates a complete submission record and returns its rendered PDF.
pub async fn handle_render_document(
    State(state): State<AppState>,
    query: Result<Query<DocumentQuery>, QueryRejection>,
    record: Result<Json<CriteriaSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let Json(record) = record?;
    let issues = validate_all(&record);
    if !issues.is_empty() {
        return Err(AppError::InvalidSubmission(issues));
    }

    let locale = query
        .locale
        .as_deref()
        .map(Locale::from_tag)
        .unwrap_or_default();
    let pdf = state.renderer.render(&record, locale).await?;

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (header::CONTENT_LANGUAGE, locale.tag().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOCUMENT_FILE_NAME}\""),
            ),
        ],
        pdf,
    ))
}
