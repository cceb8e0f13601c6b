//! Sent-message log store
//!
//! Drivers append a log record immediately after a successful send and
//! update its status by message id when a delivery query runs. The storage
//! itself is a collaborator behind [`SmsLogStore`]; the gateway only owns
//! the write contract and the [`SmsRecorder`] choke-point that applies the
//! logging gate and sensitive-data redaction before any message body is
//! persisted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::redaction::{redact, RedactionRule};

/// One sent-message record.
#[derive(Debug, Clone, Serialize)]
pub struct SmsLogEntry {
    pub provider_name: String,
    pub message_id: String,
    pub to: String,
    /// Message body, possibly redacted. Absent for patterned sends.
    pub message: Option<String>,
    pub template_id: Option<String>,
    pub from: Option<String>,
    pub status: i32,
    pub created_at: DateTime<Utc>,
}

/// Persistence collaborator for sent-message records.
#[async_trait]
pub trait SmsLogStore: Send + Sync {
    /// Append a record. Returns false when the store rejected the write.
    async fn log_sms(&self, entry: SmsLogEntry) -> bool;

    /// Update the status of a record by message id. Returns false when the
    /// id is unknown.
    async fn update_status(&self, message_id: &str, status: i32) -> bool;
}

/// Reference store keeping records in memory, used in tests and as a
/// stand-in when no database is wired up.
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    records: Mutex<Vec<SmsLogEntry>>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records, in append order.
    pub async fn records(&self) -> Vec<SmsLogEntry> {
        self.records.lock().await.clone()
    }

    pub async fn find(&self, message_id: &str) -> Option<SmsLogEntry> {
        self.records
            .lock()
            .await
            .iter()
            .find(|entry| entry.message_id == message_id)
            .cloned()
    }
}

#[async_trait]
impl SmsLogStore for InMemoryLogStore {
    async fn log_sms(&self, entry: SmsLogEntry) -> bool {
        self.records.lock().await.push(entry);
        true
    }

    async fn update_status(&self, message_id: &str, status: i32) -> bool {
        let mut records = self.records.lock().await;
        match records.iter_mut().find(|entry| entry.message_id == message_id) {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => {
                warn!("Message ID not found: {message_id}");
                false
            }
        }
    }
}

/// The single write path the drivers use. Applies the logging gate and,
/// when enabled, redaction of the message body.
#[derive(Clone)]
pub struct SmsRecorder {
    store: Arc<dyn SmsLogStore>,
    enabled: bool,
    filter_sensitive: bool,
    patterns: Arc<Vec<RedactionRule>>,
}

impl SmsRecorder {
    pub fn new(store: Arc<dyn SmsLogStore>, config: &GatewayConfig) -> Self {
        Self {
            store,
            enabled: config.enable_db_logging,
            filter_sensitive: config.enable_sensitive_data_filtering,
            patterns: Arc::new(config.patterns.clone()),
        }
    }

    /// Append a sent-message record.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        provider_name: &'static str,
        message_id: &str,
        recipient: &str,
        status: i32,
        message: Option<&str>,
        template_id: Option<&str>,
        sender: Option<&str>,
    ) -> bool {
        if !self.enabled {
            debug!("DB logging is disabled; skipping message log.");
            return false;
        }

        let message = message.map(|body| {
            if self.filter_sensitive {
                redact(body, &self.patterns)
            } else {
                body.to_string()
            }
        });

        self.store
            .log_sms(SmsLogEntry {
                provider_name: provider_name.to_string(),
                message_id: message_id.to_string(),
                to: recipient.to_string(),
                message,
                template_id: template_id.map(str::to_string),
                from: sender.map(str::to_string),
                status,
                created_at: Utc::now(),
            })
            .await
    }

    /// Update the status of a previously recorded message.
    pub async fn update_status(&self, message_id: &str, status: i32) -> bool {
        if !self.enabled {
            return false;
        }
        self.store.update_status(message_id, status).await
    }
}
