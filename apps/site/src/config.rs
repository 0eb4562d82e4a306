use anyhow::{Context, Result};

/// SMTP connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Everything the mail relay endpoints need. Present only when the whole group is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub smtp: SmtpSettings,
    pub from: String,
    pub contact_recipient: String,
    pub criteria_recipient: String,
}

/// Application configuration loaded from environment variables.
/// Missing SMTP settings are not fatal: the relay endpoints answer 500 instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub site_base_url: String,
    /// URL or filesystem path of the logo embedded in generated documents.
    pub logo_url: String,
    pub mail: Option<MailSettings>,
    /// Mail keys left unset when only part of the group is configured.
    pub mail_missing: Vec<&'static str>,
}

const MAIL_KEYS: [&str; 7] = [
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USER",
    "SMTP_PASSWORD",
    "MAIL_FROM",
    "CONTACT_RECIPIENT",
    "CRITERIA_RECIPIENT",
];

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;
        let site_base_url = get("SITE_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let (mail, mail_missing) = mail_settings(&get)?;
        Ok(Config {
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            logo_url: get("LOGO_URL").unwrap_or_else(|| format!("{site_base_url}/logo.png")),
            site_base_url,
            mail,
            mail_missing,
        })
    }
}

/// The mail group, or `None` with the keys that are missing from a partial group.
fn mail_settings(
    get: &impl Fn(&str) -> Option<String>,
) -> Result<(Option<MailSettings>, Vec<&'static str>)> {
    let missing: Vec<&'static str> = MAIL_KEYS
        .iter()
        .copied()
        .filter(|k| get(*k).is_none())
        .collect();
    if missing.len() == MAIL_KEYS.len() {
        return Ok((None, Vec::new()));
    }
    if !missing.is_empty() {
        return Ok((None, missing));
    }

    let require = |key: &str| {
        get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
    };
    let settings = MailSettings {
        smtp: SmtpSettings {
            host: require("SMTP_HOST")?,
            port: require("SMTP_PORT")?
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            username: require("SMTP_USER")?,
            password: require("SMTP_PASSWORD")?,
        },
        from: require("MAIL_FROM")?,
        contact_recipient: require("CONTACT_RECIPIENT")?,
        criteria_recipient: require("CRITERIA_RECIPIENT")?,
    };
    Ok((Some(settings), Vec::new()))
}
