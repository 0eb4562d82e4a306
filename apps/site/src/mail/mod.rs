//! Outbound e-mail. Handlers build an [`OutgoingMail`] and hand it to a [`MailRelay`];
//! the only production relay is SMTP via `lettre`.

pub mod compose;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use compose::{compose_contact_mail, compose_criteria_mail, ContactIssue, ContactRequest};
pub use smtp::SmtpRelay;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Build(String),

    #[error("SMTP transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
    pub attachment: Option<MailAttachment>,
}

/// Sends mail. Carried in `AppState` as `Arc<dyn MailRelay>` so tests can record
/// messages instead of talking to an SMTP server.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Where each form's mail goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients {
    pub contact: String,
    pub criteria: String,
}

/// A relay together with the configured recipients.
#[derive(Clone)]
pub struct Mailer {
    pub relay: Arc<dyn MailRelay>,
    pub recipients: Recipients,
}
