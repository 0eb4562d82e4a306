use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::criteria::validation::is_valid_email;
use crate::mail::{MailAttachment, OutgoingMail};

/// Body of `POST /api/contact`. Missing keys deserialize as empty strings so that they
/// are reported by [`ContactRequest::validate`] rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactIssue {
    #[error("All fields are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ContactIssue> {
        let fields = [&self.first_name, &self.last_name, &self.email, &self.message];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ContactIssue::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ContactIssue::InvalidEmail);
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Contact-form mail: replies go straight to the visitor.
pub fn compose_contact_mail(
    request: &ContactRequest,
    to: &str,
    site_base_url: &str,
) -> OutgoingMail {
    let body = format!(
        "Nouveau message depuis le formulaire de contact\n\n\
         Nom : {name}\n\
         E-mail : {email}\n\n\
         Message :\n{message}\n\n\
         --\n\
         Envoyé depuis {base}/contact\n",
        name = request.full_name(),
        email = request.email.trim(),
        message = request.message.trim(),
        base = site_base_url.trim_end_matches('/'),
    );

    OutgoingMail {
        to: to.to_string(),
        reply_to: Some(request.email.trim().to_string()),
        subject: format!("Nouveau message de {}", request.full_name()),
        body,
        attachment: None,
    }
}

/// Criteria-form mail carrying the uploaded document.
pub fn compose_criteria_mail(
    attachment: MailAttachment,
    to: &str,
    reference: Uuid,
    received_at: DateTime<Utc>,
) -> OutgoingMail {
    let body = format!(
        "Un nouveau formulaire de critères d'investissement a été soumis.\n\n\
         Référence : {reference}\n\
         Reçu le : {received}\n\
         Document : {file} ({size} octets)\n",
        received = received_at.format("%d.%m.%Y %H:%M UTC"),
        file = attachment.file_name,
        size = attachment.bytes.len(),
    );

    OutgoingMail {
        to: to.to_string(),
        reply_to: None,
        subject: format!("Critères d'investissement - {reference}"),
        body,
        attachment: Some(attachment),
    }
}
