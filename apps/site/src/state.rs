use std::sync::Arc;

use crate::config::Config;
use crate::document::DocumentRenderer;
use crate::mail::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when SMTP settings are absent; the relay endpoints then fail closed.
    pub mailer: Option<Mailer>,
    pub renderer: Arc<DocumentRenderer>,
}

impl AppState {
    pub fn mailer(&self) -> Result<&Mailer, crate::errors::AppError> {
        self.mailer
            .as_ref()
            .ok_or(crate::errors::AppError::MailNotConfigured)
    }
}
