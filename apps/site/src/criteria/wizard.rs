//! Four-step wizard state and its reducer.
//!
//! All transitions go through [`reduce`], a pure `(state, action) -> (state, effect)`
//! function. Effects are requests for the host (scrolling, redirecting); the reducer
//! never performs them itself.

use std::time::Duration;

use serde::Serialize;

use crate::criteria::model::{
    ContactField, CriteriaSubmission, IdentityField, InvestmentVolume, OptionChoice,
};
use crate::criteria::validation::{validate_step, Step, ValidationIssue};
use crate::locale::Locale;

/// Delay between a successful submission and the redirect to the home page.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);
pub const HOME_PATH: &str = "/";

// ────────────────────────────────────────────────────────────────────────────
// State, actions, effects
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Editing,
    Submitting,
    Succeeded,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    pub step: Step,
    pub record: CriteriaSubmission,
    /// Issues currently displayed to the user.
    pub errors: Vec<ValidationIssue>,
    pub status: SubmissionStatus,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: Step::FIRST,
            record: CriteriaSubmission::new(),
            errors: Vec::new(),
            status: SubmissionStatus::Editing,
        }
    }
}

impl WizardState {
    pub fn is_busy(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetIdentity(IdentityField, String),
    SetContact {
        index: usize,
        field: ContactField,
        value: String,
    },
    AddContact,
    RemoveContact(usize),
    SelectVolume(InvestmentVolume),
    Toggle(OptionChoice),
    SetRemarks(String),
    /// Validates a step and replaces the displayed errors with the result.
    Validate(Step),
    Next,
    Previous,
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScrollToForm,
    Redirect { to: &'static str, after: Duration },
}

// ────────────────────────────────────────────────────────────────────────────
// Reducer
// ────────────────────────────────────────────────────────────────────────────

pub fn reduce(mut state: WizardState, action: Action) -> (WizardState, Option<Effect>) {
    // A submission in flight freezes the form.
    if state.is_busy()
        && !matches!(action, Action::SubmitSucceeded | Action::SubmitFailed(_))
    {
        return (state, None);
    }

    match action {
        Action::SetIdentity(field, value) => {
            state.record.set_identity(field, value);
            (state, None)
        }
        Action::SetContact {
            index,
            field,
            value,
        } => {
            state.record.set_contact_field(index, field, value);
            (state, None)
        }
        Action::AddContact => {
            state.record.add_contact();
            (state, None)
        }
        Action::RemoveContact(index) => {
            state.record.remove_contact(index);
            (state, None)
        }
        Action::SelectVolume(volume) => {
            state.record.select_volume(volume);
            (state, None)
        }
        Action::Toggle(choice) => {
            state.record.toggle(choice);
            (state, None)
        }
        Action::SetRemarks(remarks) => {
            state.record.remarks = remarks;
            (state, None)
        }
        Action::Validate(step) => {
            state.errors = validate_step(&state.record, step);
            (state, None)
        }
        Action::Next => {
            state.errors = validate_step(&state.record, state.step);
            if state.errors.is_empty() {
                state.step = state.step.next();
            }
            // Scroll either way: to the next step, or up to the error list.
            (state, Some(Effect::ScrollToForm))
        }
        Action::Previous => {
            state.step = state.step.previous();
            state.errors.clear();
            (state, None)
        }
        Action::SubmitStarted => {
            if state.step.is_last() {
                state.status = SubmissionStatus::Submitting;
            }
            (state, None)
        }
        Action::SubmitSucceeded => {
            state.status = SubmissionStatus::Succeeded;
            state.record = CriteriaSubmission::new();
            state.errors.clear();
            (
                state,
                Some(Effect::Redirect {
                    to: HOME_PATH,
                    after: REDIRECT_DELAY,
                }),
            )
        }
        Action::SubmitFailed(message) => {
            state.status = SubmissionStatus::Failed { message };
            (state, None)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wizard handle
// ────────────────────────────────────────────────────────────────────────────

/// Owns one form session's state and exposes the navigation operations.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    state: WizardState,
    locale: Locale,
}

impl Wizard {
    pub fn new(locale: Locale) -> Self {
        Self {
            state: WizardState::default(),
            locale,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn record(&self) -> &CriteriaSubmission {
        &self.state.record
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let (next, effect) = reduce(std::mem::take(&mut self.state), action);
        self.state = next;
        effect
    }

    /// Validates `step`, replacing the displayed errors, and returns the issues.
    pub fn validate_step(&mut self, step: Step) -> Vec<ValidationIssue> {
        self.dispatch(Action::Validate(step));
        self.state.errors.clone()
    }

    pub fn next(&mut self) -> Option<Effect> {
        self.dispatch(Action::Next)
    }

    pub fn previous(&mut self) -> Option<Effect> {
        self.dispatch(Action::Previous)
    }

    /// Displayed errors rendered in the wizard's language.
    pub fn error_messages(&self) -> Vec<String> {
        self.state
            .errors
            .iter()
            .map(|issue| issue.message(self.locale))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::model::{Location, ObjectType};

    fn filled_step1(mut state: WizardState) -> WizardState {
        let actions = [
            Action::SetIdentity(IdentityField::CompanyName, "Acme SA".to_string()),
            Action::SetIdentity(IdentityField::Address, "Rue X 1, 1200 Genève".to_string()),
            Action::SetContact {
                index: 0,
                field: ContactField::Name,
                value: "Jane Doe".to_string(),
            },
            Action::SetContact {
                index: 0,
                field: ContactField::Email,
                value: "jane@acme.ch".to_string(),
            },
            Action::SetContact {
                index: 0,
                field: ContactField::Mobile,
                value: "+41 79 000 00 00".to_string(),
            },
        ];
        for action in actions {
            state = reduce(state, action).0;
        }
        state
    }

    // ── next / previous ─────────────────────────────────────────────────────

    #[test]
    fn test_next_blocked_by_validation_keeps_step_and_scrolls() {
        let (state, effect) = reduce(WizardState::default(), Action::Next);
        assert_eq!(state.step, Step::FIRST);
        assert!(state.errors.contains(&ValidationIssue::CompanyNameRequired));
        assert_eq!(effect, Some(Effect::ScrollToForm));
    }

    #[test]
    fn test_next_advances_when_step_valid() {
        let state = filled_step1(WizardState::default());
        let (state, effect) = reduce(state, Action::Next);
        assert_eq!(state.step.number(), 2);
        assert!(state.errors.is_empty());
        assert_eq!(effect, Some(Effect::ScrollToForm));
    }

    #[test]
    fn test_previous_clamps_and_clears_errors() {
        let (state, _) = reduce(WizardState::default(), Action::Next);
        assert!(!state.errors.is_empty());
        let (state, effect) = reduce(state, Action::Previous);
        assert_eq!(state.step, Step::FIRST);
        assert!(state.errors.is_empty());
        assert_eq!(effect, None);
    }

    #[test]
    fn test_next_on_last_step_stays_on_last() {
        let mut state = WizardState {
            step: Step::LAST,
            ..WizardState::default()
        };
        state.record.toggle(OptionChoice::PropertyForm(
            crate::criteria::model::PropertyForm::Condominium,
        ));
        state.record.toggle(OptionChoice::TransactionNature(
            crate::criteria::model::TransactionNature::ShareDeal,
        ));
        let (state, _) = reduce(state, Action::Next);
        assert_eq!(state.step, Step::LAST);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_validate_replaces_displayed_errors() {
        let (state, _) = reduce(WizardState::default(), Action::Next);
        let before = state.errors.len();
        let (state, _) = reduce(state, Action::Validate(Step::new(3).unwrap()));
        assert_ne!(state.errors.len(), before);
        assert_eq!(
            state.errors,
            vec![
                ValidationIssue::ObjectTypeRequired,
                ValidationIssue::AssignmentRequired
            ]
        );
    }

    // ── submission lifecycle ────────────────────────────────────────────────

    #[test]
    fn test_submit_started_ignored_before_last_step() {
        let (state, _) = reduce(WizardState::default(), Action::SubmitStarted);
        assert_eq!(state.status, SubmissionStatus::Editing);
    }

    #[test]
    fn test_busy_wizard_ignores_edits() {
        let state = WizardState {
            step: Step::LAST,
            ..WizardState::default()
        };
        let (state, _) = reduce(state, Action::SubmitStarted);
        assert!(state.is_busy());
        let (state, effect) = reduce(state, Action::Previous);
        assert_eq!(state.step, Step::LAST);
        assert_eq!(effect, None);
    }

    #[test]
    fn test_success_discards_record_and_schedules_redirect() {
        let mut state = filled_step1(WizardState::default());
        state.step = Step::LAST;
        state.record.toggle(OptionChoice::Location(Location::Vaud));
        let (state, _) = reduce(state, Action::SubmitStarted);
        let (state, effect) = reduce(state, Action::SubmitSucceeded);

        assert_eq!(state.status, SubmissionStatus::Succeeded);
        assert_eq!(state.record, CriteriaSubmission::new());
        assert_eq!(
            effect,
            Some(Effect::Redirect {
                to: "/",
                after: Duration::from_secs(3)
            })
        );
    }

    #[test]
    fn test_failure_keeps_last_step_for_retry() {
        let state = WizardState {
            step: Step::LAST,
            ..WizardState::default()
        };
        let (state, _) = reduce(state, Action::SubmitStarted);
        let (state, _) = reduce(state, Action::SubmitFailed("boom".to_string()));
        assert_eq!(state.step, Step::LAST);
        assert_eq!(
            state.status,
            SubmissionStatus::Failed {
                message: "boom".to_string()
            }
        );

        // A failed submission can be retried.
        let (state, _) = reduce(state, Action::SubmitStarted);
        assert!(state.is_busy());
    }

    // ── wizard handle ───────────────────────────────────────────────────────

    #[test]
    fn test_wizard_error_messages_follow_locale() {
        let mut wizard = Wizard::new(Locale::En);
        wizard.next();
        assert!(wizard
            .error_messages()
            .contains(&"Company name is required".to_string()));
    }

    #[test]
    fn test_wizard_validate_step_returns_issues() {
        let mut wizard = Wizard::new(Locale::Fr);
        wizard.dispatch(Action::Toggle(OptionChoice::ObjectType(ObjectType::Land)));
        let issues = wizard.validate_step(Step::new(3).unwrap());
        assert_eq!(issues, vec![ValidationIssue::AssignmentRequired]);
        assert_eq!(wizard.state().errors, issues);
    }
}
