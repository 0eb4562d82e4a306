//! Cookie-consent decision: persisted through an injectable store and announced on a
//! broadcast channel so that analytics and embeds can react to changes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentDecision {
    Accepted,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub decision: ConsentDecision,
    pub decided_at: DateTime<Utc>,
}

/// Published after every change has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ConsentEvent {
    Decided(ConsentRecord),
    Reset,
}

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("consent store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("consent record is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("consent store lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait ConsentStore: Send + Sync {
    async fn load(&self) -> Result<Option<ConsentRecord>, ConsentError>;

    /// `None` clears the stored decision.
    async fn save(&self, record: Option<ConsentRecord>) -> Result<(), ConsentError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Stores
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryConsentStore {
    record: Mutex<Option<ConsentRecord>>,
}

#[async_trait]
impl ConsentStore for MemoryConsentStore {
    async fn load(&self) -> Result<Option<ConsentRecord>, ConsentError> {
        Ok(self.record.lock().map_err(|_| ConsentError::Poisoned)?.clone())
    }

    async fn save(&self, record: Option<ConsentRecord>) -> Result<(), ConsentError> {
        *self.record.lock().map_err(|_| ConsentError::Poisoned)? = record;
        Ok(())
    }
}

/// Keeps the decision as a small JSON document on disk.
pub struct FileConsentStore {
    path: PathBuf,
}

impl FileConsentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConsentStore for FileConsentStore {
    async fn load(&self) -> Result<Option<ConsentRecord>, ConsentError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, record: Option<ConsentRecord>) -> Result<(), ConsentError> {
        match record {
            Some(record) => {
                let json = serde_json::to_vec_pretty(&record)?;
                tokio::fs::write(&self.path, json).await?;
            }
            None => match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            },
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ConsentService {
    store: Arc<dyn ConsentStore>,
    events: broadcast::Sender<ConsentEvent>,
}

impl ConsentService {
    pub fn new(store: Arc<dyn ConsentStore>) -> Self {
        let (events, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { store, events }
    }

    pub async fn current(&self) -> Result<Option<ConsentRecord>, ConsentError> {
        self.store.load().await
    }

    /// True only after an explicit acceptance.
    pub async fn is_granted(&self) -> Result<bool, ConsentError> {
        Ok(matches!(
            self.current().await?,
            Some(ConsentRecord {
                decision: ConsentDecision::Accepted,
                ..
            })
        ))
    }

    pub async fn accept(&self) -> Result<ConsentRecord, ConsentError> {
        self.decide(ConsentDecision::Accepted).await
    }

    pub async fn decline(&self) -> Result<ConsentRecord, ConsentError> {
        self.decide(ConsentDecision::Declined).await
    }

    pub async fn reset(&self) -> Result<(), ConsentError> {
        self.store.save(None).await?;
        self.publish(ConsentEvent::Reset);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConsentEvent> {
        self.events.subscribe()
    }

    async fn decide(&self, decision: ConsentDecision) -> Result<ConsentRecord, ConsentError> {
        let record = ConsentRecord {
            decision,
            decided_at: Utc::now(),
        };
        self.store.save(Some(record.clone())).await?;
        self.publish(ConsentEvent::Decided(record.clone()));
        Ok(record)
    }

    fn publish(&self, event: ConsentEvent) {
        // No receivers is fine.
        if self.events.send(event).is_err() {
            debug!("consent change published without subscribers");
        }
    }
}
