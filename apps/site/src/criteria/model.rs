//! The investment-criteria submission record and its option catalogues.
//!
//! The record lives for one form session only. It is created empty, mutated field by
//! field, and dropped after a successful submission.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// A submission always carries at least one contact and never more than this.
pub const MAX_CONTACTS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Option catalogues
// ────────────────────────────────────────────────────────────────────────────

/// A checkbox-style option with a stable wire key and localized labels.
pub trait CriteriaOption: Copy + Ord + 'static {
    /// Every option in display order.
    const ALL: &'static [Self];

    fn key(self) -> &'static str;

    fn label(self, locale: Locale) -> &'static str;
}

macro_rules! criteria_option {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $key:literal, $fr:literal, $en:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl CriteriaOption for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn label(self, locale: Locale) -> &'static str {
                match locale {
                    Locale::Fr => match self {
                        $($name::$variant => $fr,)+
                    },
                    Locale::En => match self {
                        $($name::$variant => $en,)+
                    },
                }
            }
        }
    };
}

criteria_option! {
    /// Investment volume bracket, in CHF millions. Single choice.
    InvestmentVolume {
        Below5 => "lt_5", "< CHF 5 mio", "< CHF 5m";
        From5To10 => "5_10", "CHF 5 - 10 mio", "CHF 5 - 10m";
        From10To25 => "10_25", "CHF 10 - 25 mio", "CHF 10 - 25m";
        From25To50 => "25_50", "CHF 25 - 50 mio", "CHF 25 - 50m";
        From50To100 => "50_100", "CHF 50 - 100 mio", "CHF 50 - 100m";
        Above100 => "gt_100", "> CHF 100 mio", "> CHF 100m";
    }
}

criteria_option! {
    Location {
        Geneva => "geneva", "Genève", "Geneva";
        Vaud => "vaud", "Vaud", "Vaud";
        Valais => "valais", "Valais", "Valais";
        Fribourg => "fribourg", "Fribourg", "Fribourg";
        Neuchatel => "neuchatel", "Neuchâtel", "Neuchâtel";
        Jura => "jura", "Jura", "Jura";
        GermanSwitzerland => "german_switzerland", "Suisse alémanique", "German-speaking Switzerland";
        Ticino => "ticino", "Tessin", "Ticino";
    }
}

criteria_option! {
    ObjectType {
        Residential => "residential", "Résidentiel", "Residential";
        Commercial => "commercial", "Commercial", "Commercial";
        Mixed => "mixed", "Mixte", "Mixed-use";
        Industrial => "industrial", "Industriel", "Industrial";
        Land => "land", "Terrain", "Land";
        Hospitality => "hospitality", "Hôtellerie", "Hospitality";
    }
}

criteria_option! {
    /// Intended use of the premises.
    Assignment {
        Housing => "housing", "Logements", "Housing";
        Offices => "offices", "Bureaux", "Offices";
        Retail => "retail", "Commerces", "Retail";
        Logistics => "logistics", "Logistique", "Logistics";
        Healthcare => "healthcare", "Santé / EMS", "Healthcare";
        Other => "other", "Autre", "Other";
    }
}

criteria_option! {
    PropertyForm {
        FullOwnership => "full_ownership", "Pleine propriété", "Full ownership";
        Condominium => "condominium", "PPE", "Condominium";
        BuildingRight => "building_right", "Droit de superficie", "Building right";
        RealEstateCompany => "real_estate_company", "Société immobilière", "Real estate company";
    }
}

criteria_option! {
    TransactionNature {
        AssetDeal => "asset_deal", "Asset deal", "Asset deal";
        ShareDeal => "share_deal", "Share deal", "Share deal";
        SaleAndLeaseback => "sale_and_leaseback", "Sale and leaseback", "Sale and leaseback";
        Development => "development", "Projet de développement", "Development project";
    }
}

/// One value of any multi-choice group, used to toggle it on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "group", content = "value", rename_all = "snake_case")]
pub enum OptionChoice {
    Location(Location),
    ObjectType(ObjectType),
    Assignment(Assignment),
    PropertyForm(PropertyForm),
    TransactionNature(TransactionNature),
}

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub position: String,
    pub email: String,
    pub mobile: String,
    pub direct_line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Position,
    Email,
    Mobile,
    DirectLine,
}

impl Contact {
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Position => &self.position,
            ContactField::Email => &self.email,
            ContactField::Mobile => &self.mobile,
            ContactField::DirectLine => &self.direct_line,
        }
    }

    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Position => &mut self.position,
            ContactField::Email => &mut self.email,
            ContactField::Mobile => &mut self.mobile,
            ContactField::DirectLine => &mut self.direct_line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    CompanyName,
    Address,
}

/// Everything collected across the four wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CriteriaSubmission {
    // Step 1: identity
    pub company_name: String,
    pub address: String,
    pub contacts: Vec<Contact>,
    // Step 2: strategy
    pub investment_volume: Option<InvestmentVolume>,
    pub location: BTreeSet<Location>,
    // Step 3: target
    pub object_type: BTreeSet<ObjectType>,
    pub assignment: BTreeSet<Assignment>,
    // Step 4: modalities
    pub property_form: BTreeSet<PropertyForm>,
    pub transaction_nature: BTreeSet<TransactionNature>,
    pub remarks: String,
}

impl Default for CriteriaSubmission {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            address: String::new(),
            contacts: vec![Contact::default()],
            investment_volume: None,
            location: BTreeSet::new(),
            object_type: BTreeSet::new(),
            assignment: BTreeSet::new(),
            property_form: BTreeSet::new(),
            transaction_nature: BTreeSet::new(),
            remarks: String::new(),
        }
    }
}

impl CriteriaSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_identity(&mut self, field: IdentityField, value: impl Into<String>) {
        let value = value.into();
        match field {
            IdentityField::CompanyName => self.company_name = value,
            IdentityField::Address => self.address = value,
        }
    }

    /// Updates one contact field. Returns `false` when the contact does not exist.
    pub fn set_contact_field(
        &mut self,
        index: usize,
        field: ContactField,
        value: impl Into<String>,
    ) -> bool {
        match self.contacts.get_mut(index) {
            Some(contact) => {
                *contact.field_mut(field) = value.into();
                true
            }
            None => false,
        }
    }

    /// Appends an empty contact. Returns `false` once `MAX_CONTACTS` is reached.
    pub fn add_contact(&mut self) -> bool {
        if self.contacts.len() >= MAX_CONTACTS {
            return false;
        }
        self.contacts.push(Contact::default());
        true
    }

    /// Removes a secondary contact. The first contact can never be removed.
    pub fn remove_contact(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.contacts.len() {
            return false;
        }
        self.contacts.remove(index);
        true
    }

    /// Selecting a volume always replaces the previous selection.
    pub fn select_volume(&mut self, volume: InvestmentVolume) {
        self.investment_volume = Some(volume);
    }

    pub fn toggle(&mut self, choice: OptionChoice) {
        match choice {
            OptionChoice::Location(v) => toggle_in(&mut self.location, v),
            OptionChoice::ObjectType(v) => toggle_in(&mut self.object_type, v),
            OptionChoice::Assignment(v) => toggle_in(&mut self.assignment, v),
            OptionChoice::PropertyForm(v) => toggle_in(&mut self.property_form, v),
            OptionChoice::TransactionNature(v) => toggle_in(&mut self.transaction_nature, v),
        }
    }

    /// Keys of the selected volume, as a list for uniform handling with the sets.
    pub fn selected_volumes(&self) -> Vec<&'static str> {
        self.investment_volume.iter().map(|v| v.key()).collect()
    }

    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts.first()
    }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
