//! Investment-criteria questionnaire: the submission record, per-step validation,
//! and the wizard reducer that drives the four steps.

pub mod model;
pub mod validation;
pub mod wizard;

pub use model::{
    Assignment, Contact, ContactField, CriteriaOption, CriteriaSubmission, IdentityField,
    InvestmentVolume, Location, ObjectType, OptionChoice, PropertyForm, TransactionNature,
};
pub use validation::{validate_all, validate_step, Step, ValidationIssue};
pub use wizard::{reduce, Action, Effect, SubmissionStatus, Wizard, WizardState};
