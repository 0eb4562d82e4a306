use crate::locale::Locale;

/// Fixed strings printed on the criteria document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentLabels {
    pub title: &'static str,
    pub identity_heading: &'static str,
    pub company: &'static str,
    pub address: &'static str,
    pub contact: &'static str,
    pub name: &'static str,
    pub position: &'static str,
    pub email: &'static str,
    pub mobile: &'static str,
    pub direct_line: &'static str,
    pub strategy_heading: &'static str,
    pub volume: &'static str,
    pub location: &'static str,
    pub target_heading: &'static str,
    pub object_type: &'static str,
    pub assignment: &'static str,
    pub modalities_heading: &'static str,
    pub property_form: &'static str,
    pub transaction_nature: &'static str,
    pub remarks: &'static str,
    pub footer_firm: &'static str,
    pub generated_on: &'static str,
}

static FR: DocumentLabels = DocumentLabels {
    title: "Critères d'investissement",
    identity_heading: "1. Identité",
    company: "Société / Nom :",
    address: "Adresse :",
    contact: "Contact",
    name: "Nom :",
    position: "Fonction :",
    email: "E-mail :",
    mobile: "Mobile :",
    direct_line: "Ligne directe :",
    strategy_heading: "2. Stratégie",
    volume: "Volume d'investissement",
    location: "Localisation",
    target_heading: "3. Cible",
    object_type: "Type d'objet",
    assignment: "Affectation",
    modalities_heading: "4. Modalités",
    property_form: "Forme de propriété",
    transaction_nature: "Nature de la transaction",
    remarks: "Remarques :",
    footer_firm: "Arcan - Conseil en transactions immobilières",
    generated_on: "Généré le",
};

static EN: DocumentLabels = DocumentLabels {
    title: "Investment criteria",
    identity_heading: "1. Identity",
    company: "Company / Name:",
    address: "Address:",
    contact: "Contact",
    name: "Name:",
    position: "Position:",
    email: "E-mail:",
    mobile: "Mobile:",
    direct_line: "Direct line:",
    strategy_heading: "2. Strategy",
    volume: "Investment volume",
    location: "Location",
    target_heading: "3. Target",
    object_type: "Object type",
    assignment: "Assignment",
    modalities_heading: "4. Modalities",
    property_form: "Property form",
    transaction_nature: "Transaction nature",
    remarks: "Remarks:",
    footer_firm: "Arcan - Real estate transaction advisory",
    generated_on: "Generated on",
};

pub fn labels_for(locale: Locale) -> &'static DocumentLabels {
    match locale {
        Locale::Fr => &FR,
        Locale::En => &EN,
    }
}
