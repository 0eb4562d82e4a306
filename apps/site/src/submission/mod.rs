//! Final-step submission: validate, render, upload, and feed the outcome back into the
//! wizard. Every failure ends as an alert string in the wizard's language and leaves the
//! wizard on the last step so the user can retry.

pub mod transport;

use std::sync::Arc;

use tracing::{info, warn};

use crate::criteria::{Action, Effect, Step, ValidationIssue, Wizard};
use crate::document::{DocumentError, DocumentRenderer};
use crate::locale::Locale;

pub use transport::{
    classify_failure, CriteriaTransport, DocumentUpload, HttpCriteriaTransport, TransportError,
    DOCUMENT_FILE_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionReport {
    /// The document was accepted; `effect` is the scheduled redirect.
    Succeeded { effect: Option<Effect> },
    /// Step 4 is incomplete; nothing was rendered or sent.
    Rejected { issues: Vec<ValidationIssue> },
    NotOnFinalStep,
    Failed { alert: String },
}

#[derive(Clone)]
pub struct SubmissionFlow {
    renderer: Arc<DocumentRenderer>,
    transport: Arc<dyn CriteriaTransport>,
}

impl SubmissionFlow {
    pub fn new(renderer: Arc<DocumentRenderer>, transport: Arc<dyn CriteriaTransport>) -> Self {
        Self {
            renderer,
            transport,
        }
    }

    pub async fn submit(&self, wizard: &mut Wizard) -> SubmissionReport {
        if !wizard.step().is_last() || wizard.state().is_busy() {
            return SubmissionReport::NotOnFinalStep;
        }
        let issues = wizard.validate_step(Step::LAST);
        if !issues.is_empty() {
            return SubmissionReport::Rejected { issues };
        }

        wizard.dispatch(Action::SubmitStarted);
        let locale = wizard.locale();

        let rendered = self.renderer.render(wizard.record(), locale).await;
        let pdf = match rendered {
            Ok(pdf) => pdf,
            Err(e) => return fail(wizard, document_alert(&e, locale)),
        };

        match self.transport.send(DocumentUpload::criteria_document(pdf)).await {
            Ok(()) => {
                info!("criteria submission accepted");
                let effect = wizard.dispatch(Action::SubmitSucceeded);
                SubmissionReport::Succeeded { effect }
            }
            Err(e) => fail(wizard, e.user_message(locale)),
        }
    }
}

fn fail(wizard: &mut Wizard, alert: String) -> SubmissionReport {
    warn!(%alert, "criteria submission failed");
    wizard.dispatch(Action::SubmitFailed(alert.clone()));
    SubmissionReport::Failed { alert }
}

fn document_alert(err: &DocumentError, locale: Locale) -> String {
    match locale {
        Locale::Fr => format!("Le document n'a pas pu être généré : {err}"),
        Locale::En => format!("The document could not be generated: {err}"),
    }
}
