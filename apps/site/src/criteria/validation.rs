use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criteria::model::{CriteriaSubmission, MAX_CONTACTS};
use crate::locale::Locale;

// ────────────────────────────────────────────────────────────────────────────
// Steps
// ────────────────────────────────────────────────────────────────────────────

/// A wizard step, always within `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    pub const LAST: Step = Step(4);

    pub fn new(number: u8) -> Option<Self> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&number)
            .then_some(Step(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// The following step, clamped to the last one.
    pub fn next(self) -> Self {
        Step((self.0 + 1).min(Self::LAST.0))
    }

    /// The preceding step, clamped to the first one.
    pub fn previous(self) -> Self {
        Step(self.0.saturating_sub(1).max(Self::FIRST.0))
    }

    pub fn all() -> impl Iterator<Item = Step> {
        (Self::FIRST.0..=Self::LAST.0).map(Step)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Step::new(value).ok_or_else(|| format!("step must be between 1 and 4, got {value}"))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Issues
// ────────────────────────────────────────────────────────────────────────────

/// A violated required-field rule. `contact` indices are 1-based, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationIssue {
    CompanyNameRequired,
    AddressRequired,
    ContactNameRequired { contact: usize },
    ContactEmailRequired { contact: usize },
    ContactEmailInvalid { contact: usize },
    ContactMobileRequired { contact: usize },
    TooManyContacts { count: usize },
    InvestmentVolumeRequired,
    LocationRequired,
    ObjectTypeRequired,
    AssignmentRequired,
    PropertyFormRequired,
    TransactionNatureRequired,
}

impl ValidationIssue {
    pub fn message(&self, locale: Locale) -> String {
        use ValidationIssue::*;
        match locale {
            Locale::Fr => match self {
                CompanyNameRequired => "Le nom de la société est requis".to_string(),
                AddressRequired => "L'adresse est requise".to_string(),
                ContactNameRequired { contact } => {
                    format!("Le nom du contact {contact} est requis")
                }
                ContactEmailRequired { contact } => {
                    format!("L'e-mail du contact {contact} est requis")
                }
                ContactEmailInvalid { contact } => {
                    format!("L'e-mail du contact {contact} n'est pas valide")
                }
                ContactMobileRequired { contact } => {
                    format!("Le mobile du contact {contact} est requis")
                }
                TooManyContacts { count } => {
                    format!("Au plus {MAX_CONTACTS} contacts sont acceptés ({count} reçus)")
                }
                InvestmentVolumeRequired => {
                    "Veuillez choisir un volume d'investissement".to_string()
                }
                LocationRequired => "Veuillez choisir au moins une localisation".to_string(),
                ObjectTypeRequired => "Veuillez choisir au moins un type d'objet".to_string(),
                AssignmentRequired => "Veuillez choisir au moins une affectation".to_string(),
                PropertyFormRequired => {
                    "Veuillez choisir au moins une forme de propriété".to_string()
                }
                TransactionNatureRequired => {
                    "Veuillez choisir au moins une nature de transaction".to_string()
                }
            },
            Locale::En => match self {
                CompanyNameRequired => "Company name is required".to_string(),
                AddressRequired => "Address is required".to_string(),
                ContactNameRequired { contact } => format!("Contact {contact} name is required"),
                ContactEmailRequired { contact } => {
                    format!("Contact {contact} email is required")
                }
                ContactEmailInvalid { contact } => format!("Contact {contact} email is invalid"),
                ContactMobileRequired { contact } => {
                    format!("Contact {contact} mobile is required")
                }
                TooManyContacts { count } => {
                    format!("At most {MAX_CONTACTS} contacts are allowed ({count} given)")
                }
                InvestmentVolumeRequired => "Please select an investment volume".to_string(),
                LocationRequired => "Please select at least one location".to_string(),
                ObjectTypeRequired => "Please select at least one object type".to_string(),
                AssignmentRequired => "Please select at least one assignment".to_string(),
                PropertyFormRequired => "Please select at least one property form".to_string(),
                TransactionNatureRequired => {
                    "Please select at least one transaction nature".to_string()
                }
            },
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(Locale::En))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Checks the fields belonging to `step` only. An empty list means the step is valid.
pub fn validate_step(record: &CriteriaSubmission, step: Step) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match step.number() {
        1 => validate_identity(record, &mut issues),
        2 => {
            if record.investment_volume.is_none() {
                issues.push(ValidationIssue::InvestmentVolumeRequired);
            }
            if record.location.is_empty() {
                issues.push(ValidationIssue::LocationRequired);
            }
        }
        3 => {
            if record.object_type.is_empty() {
                issues.push(ValidationIssue::ObjectTypeRequired);
            }
            if record.assignment.is_empty() {
                issues.push(ValidationIssue::AssignmentRequired);
            }
        }
        _ => {
            if record.property_form.is_empty() {
                issues.push(ValidationIssue::PropertyFormRequired);
            }
            if record.transaction_nature.is_empty() {
                issues.push(ValidationIssue::TransactionNatureRequired);
            }
        }
    }

    issues
}

/// Runs every step's rules, in step order.
pub fn validate_all(record: &CriteriaSubmission) -> Vec<ValidationIssue> {
    Step::all()
        .flat_map(|step| validate_step(record, step))
        .collect()
}

fn validate_identity(record: &CriteriaSubmission, issues: &mut Vec<ValidationIssue>) {
    if is_blank(&record.company_name) {
        issues.push(ValidationIssue::CompanyNameRequired);
    }
    if is_blank(&record.address) {
        issues.push(ValidationIssue::AddressRequired);
    }

    match record.primary_contact() {
        Some(primary) => {
            if is_blank(&primary.name) {
                issues.push(ValidationIssue::ContactNameRequired { contact: 1 });
            }
            if is_blank(&primary.email) {
                issues.push(ValidationIssue::ContactEmailRequired { contact: 1 });
            } else if !is_valid_email(&primary.email) {
                issues.push(ValidationIssue::ContactEmailInvalid { contact: 1 });
            }
            if is_blank(&primary.mobile) {
                issues.push(ValidationIssue::ContactMobileRequired { contact: 1 });
            }
        }
        None => {
            issues.push(ValidationIssue::ContactNameRequired { contact: 1 });
            issues.push(ValidationIssue::ContactEmailRequired { contact: 1 });
            issues.push(ValidationIssue::ContactMobileRequired { contact: 1 });
        }
    }

    if record.contacts.len() > MAX_CONTACTS {
        issues.push(ValidationIssue::TooManyContacts {
            count: record.contacts.len(),
        });
    }

    // Secondary contacts are optional; an e-mail, when given, must still be well formed.
    for (i, contact) in record.contacts.iter().enumerate().skip(1) {
        if !is_blank(&contact.email) && !is_valid_email(&contact.email) {
            issues.push(ValidationIssue::ContactEmailInvalid { contact: i + 1 });
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Accepts the basic `local@domain.tld` shape: no whitespace, exactly one `@`,
/// non-empty local part, and a domain with a dot that is neither first nor last.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rfind('.') {
        Some(dot) => dot > 0 && dot < domain.len() - 1,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::model::{
        Assignment, ContactField, InvestmentVolume, Location, ObjectType, OptionChoice,
        PropertyForm, TransactionNature,
    };

    fn complete_identity() -> CriteriaSubmission {
        let mut record = CriteriaSubmission::new();
        record.company_name = "Acme SA".to_string();
        record.address = "Rue X 1, 1200 Genève".to_string();
        record.set_contact_field(0, ContactField::Name, "Jane Doe");
        record.set_contact_field(0, ContactField::Email, "jane@acme.ch");
        record.set_contact_field(0, ContactField::Mobile, "+41 79 000 00 00");
        record
    }

    fn complete_record() -> CriteriaSubmission {
        let mut record = complete_identity();
        record.select_volume(InvestmentVolume::From10To25);
        record.toggle(OptionChoice::Location(Location::Geneva));
        record.toggle(OptionChoice::ObjectType(ObjectType::Residential));
        record.toggle(OptionChoice::Assignment(Assignment::Housing));
        record.toggle(OptionChoice::PropertyForm(PropertyForm::FullOwnership));
        record.toggle(OptionChoice::TransactionNature(TransactionNature::AssetDeal));
        record
    }

    // ── step 1 ──────────────────────────────────────────────────────────────

    #[test]
    fn test_step1_missing_company_name_is_the_only_issue() {
        let mut record = complete_identity();
        record.company_name.clear();
        assert_eq!(
            validate_step(&record, Step::FIRST),
            vec![ValidationIssue::CompanyNameRequired]
        );
    }

    #[test]
    fn test_step1_whitespace_only_counts_as_missing() {
        let mut record = complete_identity();
        record.address = "   ".to_string();
        assert_eq!(
            validate_step(&record, Step::FIRST),
            vec![ValidationIssue::AddressRequired]
        );
    }

    #[test]
    fn test_step1_empty_record_reports_all_identity_fields() {
        let issues = validate_step(&CriteriaSubmission::new(), Step::FIRST);
        assert_eq!(
            issues,
            vec![
                ValidationIssue::CompanyNameRequired,
                ValidationIssue::AddressRequired,
                ValidationIssue::ContactNameRequired { contact: 1 },
                ValidationIssue::ContactEmailRequired { contact: 1 },
                ValidationIssue::ContactMobileRequired { contact: 1 },
            ]
        );
    }

    #[test]
    fn test_step1_malformed_primary_email() {
        let mut record = complete_identity();
        record.set_contact_field(0, ContactField::Email, "jane.acme.ch");
        assert_eq!(
            validate_step(&record, Step::FIRST),
            vec![ValidationIssue::ContactEmailInvalid { contact: 1 }]
        );
    }

    #[test]
    fn test_step1_secondary_contact_email_checked_only_when_given() {
        let mut record = complete_identity();
        record.add_contact();
        assert!(validate_step(&record, Step::FIRST).is_empty());

        record.set_contact_field(1, ContactField::Email, "nope@");
        assert_eq!(
            validate_step(&record, Step::FIRST),
            vec![ValidationIssue::ContactEmailInvalid { contact: 2 }]
        );
    }

    #[test]
    fn test_step1_rejects_more_contacts_than_allowed() {
        let mut record = complete_identity();
        record.contacts = vec![record.contacts[0].clone(); MAX_CONTACTS + 1];
        assert_eq!(
            validate_step(&record, Step::FIRST),
            vec![ValidationIssue::TooManyContacts { count: 4 }]
        );
        assert!(ValidationIssue::TooManyContacts { count: 4 }
            .message(Locale::En)
            .contains("At most 3"));
    }

    #[test]
    fn test_step1_ignores_later_steps() {
        let record = complete_identity();
        assert!(validate_step(&record, Step::FIRST).is_empty());
        assert!(!validate_step(&record, Step::LAST).is_empty());
    }

    // ── steps 2-4 ───────────────────────────────────────────────────────────

    #[test]
    fn test_step2_requires_volume_and_location() {
        let record = complete_identity();
        let step2 = Step::new(2).unwrap();
        assert_eq!(
            validate_step(&record, step2),
            vec![
                ValidationIssue::InvestmentVolumeRequired,
                ValidationIssue::LocationRequired
            ]
        );
    }

    #[test]
    fn test_step3_requires_object_type_and_assignment() {
        let mut record = complete_record();
        record.toggle(OptionChoice::Assignment(Assignment::Housing));
        assert_eq!(
            validate_step(&record, Step::new(3).unwrap()),
            vec![ValidationIssue::AssignmentRequired]
        );
    }

    #[test]
    fn test_step4_requires_property_form_and_transaction_nature() {
        let mut record = complete_record();
        record.toggle(OptionChoice::PropertyForm(PropertyForm::FullOwnership));
        record.toggle(OptionChoice::TransactionNature(TransactionNature::AssetDeal));
        assert_eq!(
            validate_step(&record, Step::LAST),
            vec![
                ValidationIssue::PropertyFormRequired,
                ValidationIssue::TransactionNatureRequired
            ]
        );
    }

    #[test]
    fn test_complete_record_passes_every_step() {
        let record = complete_record();
        for step in Step::all() {
            assert!(validate_step(&record, step).is_empty(), "step {step:?}");
        }
        assert!(validate_all(&record).is_empty());
    }

    #[test]
    fn test_remarks_are_optional() {
        let record = complete_record();
        assert!(record.remarks.is_empty());
        assert!(validate_step(&record, Step::LAST).is_empty());
    }

    // ── step bounds ─────────────────────────────────────────────────────────

    #[test]
    fn test_step_bounds_are_clamped() {
        assert_eq!(Step::FIRST.previous(), Step::FIRST);
        assert_eq!(Step::LAST.next(), Step::LAST);
        assert_eq!(Step::FIRST.next().number(), 2);
        assert!(Step::new(0).is_none());
        assert!(Step::new(5).is_none());
    }

    // ── email shape ─────────────────────────────────────────────────────────

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jane@acme.ch"));
        assert!(is_valid_email("  jane.doe+x@mail.acme.ch "));
        assert!(!is_valid_email("jane@acme"));
        assert!(!is_valid_email("@acme.ch"));
        assert!(!is_valid_email("jane@.ch"));
        assert!(!is_valid_email("jane@acme."));
        assert!(!is_valid_email("ja ne@acme.ch"));
        assert!(!is_valid_email("jane@@acme.ch"));
    }

    #[test]
    fn test_messages_are_localized() {
        let issue = ValidationIssue::CompanyNameRequired;
        assert_eq!(issue.message(Locale::En), "Company name is required");
        assert!(issue.message(Locale::Fr).contains("société"));
        assert_eq!(
            ValidationIssue::ContactMobileRequired { contact: 2 }.to_string(),
            "Contact 2 mobile is required"
        );
    }
}
