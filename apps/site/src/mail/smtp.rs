use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::SmtpSettings;
use crate::mail::{MailError, MailRelay, OutgoingMail};

/// Port on which the relay expects implicit TLS; every other port upgrades with STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpRelay {
    /// Must be called from within a Tokio runtime.
    pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self, MailError> {
        let builder = if settings.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| MailError::Transport(e.to_string()))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox(from)?,
        })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let to = mail.to.clone();
        let message = build_message(&self.from, mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        info!(to = %to, "mail relayed");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the MIME message: plain text alone, or `multipart/mixed` with the attachment.
pub fn build_message(from: &Mailbox, mail: OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject);
    if let Some(reply_to) = &mail.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    let built = match mail.attachment {
        None => builder.singlepart(SinglePart::plain(mail.body)),
        Some(attachment) => {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| MailError::Build(e.to_string()))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(mail.body))
                    .singlepart(
                        Attachment::new(attachment.file_name)
                            .body(attachment.bytes.to_vec(), content_type),
                    ),
            )
        }
    };

    built.map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MailAttachment;
    use bytes::Bytes;

    fn from() -> Mailbox {
        parse_mailbox("Arcan <no-reply@arcan.test>").unwrap()
    }

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to: "office@arcan.test".to_string(),
            reply_to: Some("jane@acme.ch".to_string()),
            subject: "Nouveau message".to_string(),
            body: "Bonjour".to_string(),
            attachment: None,
        }
    }

    #[test]
    fn test_plain_message_has_reply_to() {
        let message = build_message(&from(), mail()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Reply-To: jane@acme.ch"));
        assert!(raw.contains("To: office@arcan.test"));
        assert!(!raw.contains("multipart/mixed"));
    }

    #[test]
    fn test_attachment_produces_mixed_multipart() {
        let mut mail = mail();
        mail.reply_to = None;
        mail.attachment = Some(MailAttachment {
            file_name: "arcan_criteres_investissement.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.3"),
        });
        let raw = String::from_utf8(build_message(&from(), mail).unwrap().formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("arcan_criteres_investissement.pdf"));
        assert!(!raw.contains("Reply-To"));
    }

    #[test]
    fn test_invalid_recipient_is_address_error() {
        let mut mail = mail();
        mail.to = "not an address".to_string();
        let err = build_message(&from(), mail).unwrap_err();
        assert!(matches!(err, MailError::Address { .. }));
    }

    #[tokio::test]
    async fn test_relay_builds_without_connecting() {
        let settings = SmtpSettings {
            host: "smtp.arcan.test".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        assert!(SmtpRelay::new(&settings, "no-reply@arcan.test").is_ok());
        assert!(matches!(
            SmtpRelay::new(&settings, "nope"),
            Err(MailError::Address { .. })
        ));
    }
}
