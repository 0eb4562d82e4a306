use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, multipart, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::document::PDF_CONTENT_TYPE;
use crate::locale::Locale;

/// Name under which the criteria document is uploaded and mailed.
pub const DOCUMENT_FILE_NAME: &str = "arcan_criteres_investissement.pdf";

pub const CRITERIA_ENDPOINT: &str = "/api/criteria";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl DocumentUpload {
    pub fn criteria_document(bytes: Bytes) -> Self {
        Self {
            file_name: DOCUMENT_FILE_NAME.to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a JSON `{"error": ...}` body.
    #[error("HTTP {status}: {message}")]
    Structured { status: u16, message: String },

    #[error("HTTP {status}")]
    Generic { status: u16 },

    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Alert text shown to the user.
    pub fn user_message(&self, locale: Locale) -> String {
        match (self, locale) {
            (TransportError::Structured { message, .. }, Locale::Fr) => {
                format!("L'envoi a échoué : {message}")
            }
            (TransportError::Structured { message, .. }, Locale::En) => {
                format!("Submission failed: {message}")
            }
            (TransportError::Generic { status }, Locale::Fr) => {
                format!("L'envoi a échoué (HTTP {status}). Veuillez réessayer.")
            }
            (TransportError::Generic { status }, Locale::En) => {
                format!("Submission failed (HTTP {status}). Please try again.")
            }
            (TransportError::Network(reason), Locale::Fr) => format!("Erreur réseau : {reason}"),
            (TransportError::Network(reason), Locale::En) => format!("Network error: {reason}"),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Maps a non-2xx response to the structured or generic error.
pub fn classify_failure(status: u16, content_type: Option<&str>, body: &[u8]) -> TransportError {
    let is_json = content_type
        .map(|ct| ct.trim_start().starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
            return TransportError::Structured {
                status,
                message: parsed.error,
            };
        }
    }
    TransportError::Generic { status }
}

/// Delivers the rendered document to the mail relay.
#[async_trait]
pub trait CriteriaTransport: Send + Sync {
    async fn send(&self, upload: DocumentUpload) -> Result<(), TransportError>;
}

/// Posts the document as `multipart/form-data` with a single `file` field.
pub struct HttpCriteriaTransport {
    client: Client,
    endpoint: String,
}

impl HttpCriteriaTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}{CRITERIA_ENDPOINT}", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CriteriaTransport for HttpCriteriaTransport {
    async fn send(&self, upload: DocumentUpload) -> Result<(), TransportError> {
        let size = upload.bytes.len();
        let part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(PDF_CONTENT_TYPE)
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "criteria upload failed");
                TransportError::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint = %self.endpoint, size, "criteria document delivered");
            return Ok(());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.unwrap_or_default();
        let err = classify_failure(status.as_u16(), content_type.as_deref(), &body);
        warn!(endpoint = %self.endpoint, error = %err, "criteria upload rejected");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Multipart,
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use serde_json::json;

    // ── classify_failure ────────────────────────────────────────────────────

    #[test]
    fn test_json_error_body_is_structured() {
        let err = classify_failure(
            500,
            Some("application/json; charset=utf-8"),
            br#"{"error":"SMTP configuration missing"}"#,
        );
        assert_eq!(
            err,
            TransportError::Structured {
                status: 500,
                message: "SMTP configuration missing".to_string()
            }
        );
    }

    #[test]
    fn test_non_json_body_is_generic() {
        assert_eq!(
            classify_failure(502, Some("text/html"), b"<html>Bad gateway</html>"),
            TransportError::Generic { status: 502 }
        );
        assert_eq!(
            classify_failure(500, None, b""),
            TransportError::Generic { status: 500 }
        );
    }

    #[test]
    fn test_json_without_error_key_is_generic() {
        assert_eq!(
            classify_failure(400, Some("application/json"), br#"{"detail":"x"}"#),
            TransportError::Generic { status: 400 }
        );
    }

    #[test]
    fn test_user_messages_are_localized() {
        let err = TransportError::Generic { status: 503 };
        assert!(err.user_message(Locale::Fr).contains("503"));
        assert!(err.user_message(Locale::En).starts_with("Submission failed"));
        let err = TransportError::Structured {
            status: 500,
            message: "SMTP configuration missing".to_string(),
        };
        assert!(err
            .user_message(Locale::Fr)
            .contains("SMTP configuration missing"));
    }

    // ── HTTP transport ──────────────────────────────────────────────────────

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn echo_file(mut multipart: Multipart) -> (StatusCode, Json<serde_json::Value>) {
        while let Some(field) = multipart.next_field().await.unwrap() {
            if field.name() == Some("file") {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let len = field.bytes().await.unwrap().len();
                if name != DOCUMENT_FILE_NAME || content_type != "application/pdf" || len == 0 {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unexpected part" })));
                }
                return (StatusCode::OK, Json(json!({ "message": "ok" })));
            }
        }
        (StatusCode::BAD_REQUEST, Json(json!({ "error": "No file provided" })))
    }

    #[tokio::test]
    async fn test_upload_sends_named_pdf_part() {
        let base = serve(Router::new().route(CRITERIA_ENDPOINT, post(echo_file))).await;
        let transport = HttpCriteriaTransport::new(&format!("{base}/")).unwrap();
        assert_eq!(transport.endpoint(), format!("{base}/api/criteria"));

        let upload = DocumentUpload::criteria_document(Bytes::from_static(b"%PDF-1.3"));
        transport.send(upload).await.unwrap();
    }

    #[tokio::test]
    async fn test_structured_rejection_carries_message() {
        let app = Router::new().route(
            CRITERIA_ENDPOINT,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "SMTP configuration missing" })),
                )
            }),
        );
        let transport = HttpCriteriaTransport::new(&serve(app).await).unwrap();
        let err = transport
            .send(DocumentUpload::criteria_document(Bytes::from_static(b"%PDF")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Structured { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_plain_rejection_is_generic() {
        let app = Router::new().route(
            CRITERIA_ENDPOINT,
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let transport = HttpCriteriaTransport::new(&serve(app).await).unwrap();
        let err = transport
            .send(DocumentUpload::criteria_document(Bytes::from_static(b"%PDF")))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Generic { status: 502 });
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpCriteriaTransport::new(&format!("http://{addr}")).unwrap();
        let err = transport
            .send(DocumentUpload::criteria_document(Bytes::from_static(b"%PDF")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
