//! Gateway orchestration
//!
//! [`SmsGateway`] resolves a configured driver, fans a request out to every
//! recipient, and composes caching and retry around the unreliable network
//! call. Requests are immutable values produced by [`SmsRequestBuilder`],
//! so a gateway instance is safe to share across calls.
//!
//! Configuration and request mistakes (`Configuration`, `InvalidRequest`)
//! propagate to the caller as errors. Driver failures inside the fan-out
//! never do: every recipient is attempted and each outcome lands in the
//! returned [`SmsMultiResponse`].

use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::cache::Cache;
use crate::config::{DriverEntry, GatewayConfig};
use crate::drivers::{build_driver, SmsDriver};
use crate::error::SmsError;
use crate::http::HttpTransport;
use crate::log::{SmsLogStore, SmsRecorder};
use crate::redaction::mask_phone;
use crate::response::{SmsMultiResponse, SmsResponse};

/// A recipient: either a phone number, or a contact object from which the
/// configured phone field is extracted at dispatch time.
#[derive(Debug, Clone)]
pub enum Recipient {
    Number(String),
    Contact(Value),
}

/// What gets sent: free text, or a vendor-side template reference.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Pattern {
        code: String,
        values: Vec<(String, String)>,
    },
}

/// Immutable description of one dispatch, consumed by [`SmsGateway::send`].
#[derive(Debug, Clone)]
pub struct SmsRequest {
    driver: Option<String>,
    sender: Option<String>,
    recipients: Vec<Recipient>,
    content: Option<MessageContent>,
}

impl SmsRequest {
    pub fn builder() -> SmsRequestBuilder {
        SmsRequestBuilder::default()
    }
}

/// Builder for [`SmsRequest`].
#[derive(Debug, Default)]
pub struct SmsRequestBuilder {
    driver: Option<String>,
    sender: Option<String>,
    recipients: Vec<Recipient>,
    content: Option<MessageContent>,
}

impl SmsRequestBuilder {
    /// Name the driver to use; the configured default applies otherwise.
    pub fn driver(mut self, name: impl Into<String>) -> Self {
        self.driver = Some(name.into());
        self
    }

    /// Sender line; the active driver's default sender applies otherwise.
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Add one recipient phone number.
    pub fn to(mut self, number: impl Into<String>) -> Self {
        self.recipients.push(Recipient::Number(number.into()));
        self
    }

    /// Add several recipient phone numbers.
    pub fn to_many<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for number in numbers {
            self.recipients.push(Recipient::Number(number.into()));
        }
        self
    }

    /// Add a contact object; the configured phone field is extracted from
    /// it when the request is dispatched.
    pub fn contact(mut self, contact: Value) -> Self {
        self.recipients.push(Recipient::Contact(contact));
        self
    }

    /// Free-text message body. Replaces any previously set pattern.
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.content = Some(MessageContent::Text(text.into()));
        self
    }

    /// Vendor-side template with ordered `(name, value)` pairs. Replaces
    /// any previously set message.
    pub fn pattern(mut self, code: impl Into<String>, values: Vec<(String, String)>) -> Self {
        self.content = Some(MessageContent::Pattern {
            code: code.into(),
            values,
        });
        self
    }

    pub fn build(self) -> SmsRequest {
        SmsRequest {
            driver: self.driver,
            sender: self.sender,
            recipients: self.recipients,
            content: self.content,
        }
    }
}

/// The orchestration service: driver selection, fan-out, caching, retry.
pub struct SmsGateway {
    config: GatewayConfig,
    cache: Arc<dyn Cache>,
    recorder: SmsRecorder,
    transport: Arc<dyn HttpTransport>,
}

impl SmsGateway {
    pub fn new(
        config: GatewayConfig,
        cache: Arc<dyn Cache>,
        log_store: Arc<dyn SmsLogStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let recorder = SmsRecorder::new(log_store, &config);
        Self {
            config,
            cache,
            recorder,
            transport,
        }
    }

    fn driver_entry(&self, name: &str) -> Result<&DriverEntry, SmsError> {
        let entry = self.config.drivers.get(name).ok_or_else(|| {
            error!("Driver '{name}' not found in configuration.");
            SmsError::Configuration(format!("driver '{name}' not found in configuration"))
        })?;

        if !entry.settings.is_available {
            warn!("Driver '{name}' is not available.");
            return Err(SmsError::Configuration(format!(
                "driver '{name}' is not available"
            )));
        }

        Ok(entry)
    }

    fn resolve_driver(&self, name: Option<&str>) -> Result<Box<dyn SmsDriver>, SmsError> {
        let name = name.unwrap_or(&self.config.default_driver);
        let entry = self.driver_entry(name)?;
        build_driver(
            entry.kind,
            &entry.settings,
            self.recorder.clone(),
            Arc::clone(&self.transport),
        )
    }

    fn resolve_recipients(&self, request: &SmsRequest) -> Result<Vec<String>, SmsError> {
        request
            .recipients
            .iter()
            .map(|recipient| match recipient {
                Recipient::Number(number) => Ok(number.clone()),
                Recipient::Contact(contact) => contact
                    .get(&self.config.phone_field)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        error!(
                            "The provided contact does not have a '{}' field.",
                            self.config.phone_field
                        );
                        SmsError::InvalidRequest(format!(
                            "the provided contact does not have a '{}' field",
                            self.config.phone_field
                        ))
                    }),
            })
            .collect()
    }

    /// Dispatch a request to every recipient and collect the outcomes.
    ///
    /// Plain sends go through the cache-first retrying path; pattern sends
    /// are a single attempt each. Recipients are processed in order and
    /// none is skipped because an earlier one failed.
    pub async fn send(&self, request: &SmsRequest) -> Result<SmsMultiResponse, SmsError> {
        let recipients = self.resolve_recipients(request)?;

        if recipients.is_empty() {
            error!("At least one receiver must be set.");
            return Err(SmsError::InvalidRequest(
                "at least one receiver must be set".to_string(),
            ));
        }

        let content = request.content.as_ref().ok_or_else(|| {
            error!("Message text is not set.");
            SmsError::InvalidRequest("message text is not set".to_string())
        })?;

        let driver_name = request
            .driver
            .as_deref()
            .unwrap_or(&self.config.default_driver);
        let entry = self.driver_entry(driver_name)?;
        let driver = build_driver(
            entry.kind,
            &entry.settings,
            self.recorder.clone(),
            Arc::clone(&self.transport),
        )?;

        let sender = request
            .sender
            .clone()
            .or_else(|| entry.settings.default_sender.clone())
            .unwrap_or_default();

        let mut multi = SmsMultiResponse::new();

        for recipient in &recipients {
            let response = match content {
                MessageContent::Pattern { code, values } => {
                    self.send_patterned(driver.as_ref(), recipient, code, values)
                        .await
                }
                MessageContent::Text(text) => {
                    self.send_with_retry(driver.as_ref(), recipient, text, &sender)
                        .await
                }
            };
            multi.insert(recipient.clone(), response);
        }

        info!(
            "SMS dispatch via '{driver_name}' finished for {} recipient(s).",
            multi.len()
        );

        Ok(multi)
    }

    /// Plain-send path for one recipient: cache lookup, then the retry
    /// loop. Exhaustion yields an unsuccessful response, never an error.
    async fn send_with_retry(
        &self,
        driver: &dyn SmsDriver,
        recipient: &str,
        message: &str,
        sender: &str,
    ) -> SmsResponse {
        let attempts = self.config.retry_attempts;

        for attempt in 1..=attempts {
            let response = self.send_to_recipient(driver, recipient, message, sender).await;
            if response.is_ok() {
                return response;
            }

            warn!(
                "Attempt {attempt} failed for recipient: {}",
                mask_phone(recipient)
            );

            if attempt < attempts && !self.config.retry_delay.is_zero() {
                sleep(self.config.retry_delay).await;
            }
        }

        SmsResponse::new(
            false,
            format!("Failed after {attempts} attempts."),
            recipient,
            None,
        )
    }

    async fn send_to_recipient(
        &self,
        driver: &dyn SmsDriver,
        recipient: &str,
        message: &str,
        sender: &str,
    ) -> SmsResponse {
        let cache_key = send_cache_key(recipient, message);

        // Identical repeated requests within the TTL window are served from
        // cache; the provider already delivered this exact message.
        if let Some(cached) = self.cache.get(&cache_key).await {
            info!("SMS to {} served from cache.", mask_phone(recipient));
            return SmsResponse::new(true, cached, recipient, None);
        }

        match driver.send(recipient, message, sender).await {
            Ok(message_id) => {
                self.cache
                    .save(&cache_key, &message_id, self.config.cache_ttl)
                    .await;

                info!(
                    "SMS forwarded; message ID {message_id} received from the service provider."
                );

                SmsResponse::new(
                    true,
                    format!(
                        "The SMS was successfully forwarded, and message ID {message_id} has been received from the service provider."
                    ),
                    recipient,
                    Some(message_id),
                )
            }
            Err(e) => {
                error!("Failed to send SMS to {}: {e}", mask_phone(recipient));
                SmsResponse::new(
                    false,
                    format!("Failed to send message: {e}"),
                    recipient,
                    None,
                )
            }
        }
    }

    /// Patterned path: one attempt, no cache. Pattern sends are
    /// side-effect-bearing per call and not safely repeatable.
    async fn send_patterned(
        &self,
        driver: &dyn SmsDriver,
        recipient: &str,
        code: &str,
        values: &[(String, String)],
    ) -> SmsResponse {
        match driver.send_patterned(recipient, code, values).await {
            Ok(message_id) => {
                info!(
                    "Patterned SMS sent to {} with message ID: {message_id}",
                    mask_phone(recipient)
                );
                SmsResponse::new(
                    true,
                    format!("Patterned message ID {message_id} delivered successfully."),
                    recipient,
                    Some(message_id),
                )
            }
            Err(e) => {
                error!(
                    "Failed to send patterned SMS to {}: {e}",
                    mask_phone(recipient)
                );
                SmsResponse::new(
                    false,
                    format!("Failed to send patterned message: {e}"),
                    recipient,
                    None,
                )
            }
        }
    }

    /// Query the delivery status of a sent message, cached for an hour.
    ///
    /// The returned response reuses the `recipient` field to carry the
    /// message id, kept for compatibility with existing callers.
    pub async fn get_delivery_status(
        &self,
        message_id: &str,
        driver: Option<&str>,
    ) -> Result<SmsResponse, SmsError> {
        let cache_key = format!("sms:status:{message_id}");

        if let Some(cached) = self.cache.get(&cache_key).await {
            info!("SMS status for message ID {message_id} served from cache.");
            return Ok(SmsResponse::new(
                true,
                cached,
                message_id,
                Some(message_id.to_string()),
            ));
        }

        let driver = self.resolve_driver(driver)?;
        let status = driver.get_delivery_status(message_id).await?;

        self.cache
            .save(&cache_key, &status, self.config.status_cache_ttl)
            .await;
        info!("SMS status for message ID {message_id} retrieved from driver.");

        Ok(SmsResponse::new(
            true,
            status,
            message_id,
            Some(message_id.to_string()),
        ))
    }

    /// Query the remaining credit balance of a named driver.
    ///
    /// A driver must be named explicitly; there is no default-driver
    /// fallback for credit queries.
    pub async fn get_credit(&self, driver: &str) -> Result<f64, SmsError> {
        let driver = self.resolve_driver(Some(driver))?;

        match driver.get_credit_balance().await {
            Ok(credit) => {
                info!("Credit retrieved successfully: {credit}");
                Ok(credit)
            }
            Err(e) => {
                error!("Failed to retrieve credit: {e}");
                Err(e)
            }
        }
    }
}

/// Content-addressed cache key for a `(recipient, message)` pair.
fn send_cache_key(recipient: &str, message: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(recipient.as_bytes());
    hasher.update(message.as_bytes());
    format!("sms:send:{}", hex::encode(hasher.finalize()))
}
