//! Gateway configuration
//!
//! Loaded once at wiring time and immutable afterwards. The driver map
//! associates a configured name with an adapter kind plus its string
//! settings (API credentials, default sender, availability flag).

use std::collections::HashMap;
use std::time::Duration;

use crate::error::SmsError;
use crate::redaction::{default_rules, RedactionRule};

/// The compile-time-known set of provider adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    Twilio,
    Farazsms,
    SmsIr,
    Amootsms,
}

/// String settings for one configured driver: API keys, service
/// identifiers, the default sender and an availability flag.
#[derive(Debug, Clone)]
pub struct DriverSettings {
    values: HashMap<String, String>,
    pub default_sender: Option<String>,
    pub is_available: bool,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            default_sender: None,
            is_available: true,
        }
    }
}

impl DriverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setting of a string value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style default sender.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = Some(sender.into());
        self
    }

    /// Mark the driver as disabled without removing its configuration.
    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Fetch a setting the driver cannot work without.
    pub(crate) fn require(&self, key: &str) -> Result<&str, SmsError> {
        self.get(key).ok_or_else(|| {
            SmsError::Configuration(format!("missing required driver setting '{key}'"))
        })
    }
}

/// One configured driver: the adapter kind and its settings.
#[derive(Debug, Clone)]
pub struct DriverEntry {
    pub kind: DriverKind,
    pub settings: DriverSettings,
}

/// Configuration surface consumed by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Configured drivers by name.
    pub drivers: HashMap<String, DriverEntry>,
    /// Driver used when a request names none.
    pub default_driver: String,
    /// Field extracted from contact objects passed as recipients.
    pub phone_field: String,
    /// Attempt ceiling for the plain-send path. Zero means the driver is
    /// never invoked and every recipient reports failure.
    pub retry_attempts: u32,
    /// Delay between send attempts.
    pub retry_delay: Duration,
    /// TTL for cached send results.
    pub cache_ttl: Duration,
    /// TTL for cached delivery-status titles.
    pub status_cache_ttl: Duration,
    /// Record sent messages in the log store.
    pub enable_db_logging: bool,
    /// Redact message bodies before they are persisted.
    pub enable_sensitive_data_filtering: bool,
    /// Ordered redaction rule table.
    pub patterns: Vec<RedactionRule>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            drivers: HashMap::new(),
            default_driver: "twilio".to_string(),
            phone_field: "phone".to_string(),
            retry_attempts: 3,
            retry_delay: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(60),
            status_cache_ttl: Duration::from_secs(3600),
            enable_db_logging: true,
            enable_sensitive_data_filtering: true,
            patterns: default_rules(),
        }
    }
}

impl GatewayConfig {
    /// Builder-style driver registration.
    pub fn driver(mut self, name: impl Into<String>, kind: DriverKind, settings: DriverSettings) -> Self {
        self.drivers.insert(name.into(), DriverEntry { kind, settings });
        self
    }
}
