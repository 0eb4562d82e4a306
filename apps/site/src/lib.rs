//! Arcan website services: the investment-criteria wizard and its PDF document, the
//! submission transport, the SMTP mail relay endpoints, and the cookie-consent service.

pub mod config;
pub mod consent;
pub mod criteria;
pub mod document;
pub mod errors;
pub mod layout;
pub mod locale;
pub mod mail;
pub mod routes;
pub mod state;
pub mod submission;
