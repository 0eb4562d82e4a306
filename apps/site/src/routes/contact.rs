use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::mail::{compose_contact_mail, ContactRequest};
use crate::state::AppState;

/// POST /api/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = body?;
    req.validate().map_err(|issue| AppError::Validation(issue.to_string()))?;
    let mailer = state.mailer()?;

    let mail = compose_contact_mail(
        &req,
        &mailer.recipients.contact,
        &state.config.site_base_url,
    );
    mailer.relay.send(mail).await?;
    info!(from = %req.email.trim(), "contact message relayed");

    Ok(Json(json!({ "message": "Email sent successfully" })))
}
