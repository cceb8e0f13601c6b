//! Amootsms driver
//!
//! Query-string API authenticated with a `Token` parameter; every call is a
//! GET. Success is signaled by `Status == "Success"` in the payload.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{error, info};

use crate::config::DriverSettings;
use crate::drivers::{fetch_json, value_to_string, SmsDriver, UNSUCCESSFUL_API_STATUS};
use crate::error::SmsError;
use crate::http::{HttpRequest, HttpTransport};
use crate::log::SmsRecorder;
use crate::redaction::mask_phone;
use crate::status::amootsms::DeliveryStatus;

const DEFAULT_BASE_URL: &str = "https://portal.amootsms.com/rest";
const PROVIDER: &str = "amootsms";

/// Initial status persisted for a freshly accepted message (the vendor's
/// `Unknown` code; the real state arrives with the first delivery query).
const INITIAL_STATUS: i32 = 100;

pub struct AmootsmsDriver {
    token: String,
    base_url: String,
    recorder: SmsRecorder,
    transport: Arc<dyn HttpTransport>,
}

impl AmootsmsDriver {
    pub fn new(
        settings: &DriverSettings,
        recorder: SmsRecorder,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, SmsError> {
        Ok(Self {
            token: settings.require("token")?.to_string(),
            base_url: settings
                .get("base_url")
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            recorder,
            transport,
        })
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}/{path}", self.base_url)).query("Token", &self.token)
    }

    async fn submit(&self, request: HttpRequest) -> Result<Value, String> {
        let payload = fetch_json(self.transport.as_ref(), request, 200).await?;

        if payload["Status"] == "Success" {
            return Ok(payload);
        }

        Err(UNSUCCESSFUL_API_STATUS.to_string())
    }

    /// Scheduled dispatch time sent with every simple send.
    fn send_date_time() -> String {
        (Utc::now() + chrono::Duration::hours(2)).to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[async_trait]
impl SmsDriver for AmootsmsDriver {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(
        &self,
        recipient: &str,
        message: &str,
        sender: &str,
    ) -> Result<String, SmsError> {
        let request = self
            .request("SendSimple")
            .query("SendDateTime", Self::send_date_time())
            .query("SMSMessageText", message)
            .query("LineNumber", sender)
            .query("Mobiles", recipient);

        let message_id = match self.submit(request).await {
            Ok(payload) => value_to_string(&payload["Data"][0]["MessageID"])
                .ok_or_else(|| UNSUCCESSFUL_API_STATUS.to_string()),
            Err(cause) => Err(cause),
        };

        match message_id {
            Ok(message_id) => {
                self.recorder
                    .record(
                        PROVIDER,
                        &message_id,
                        recipient,
                        INITIAL_STATUS,
                        Some(message),
                        None,
                        Some(sender),
                    )
                    .await;
                Ok(message_id)
            }
            Err(cause) => {
                error!(
                    "amootsms: failed to send SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending simple SMS", cause))
            }
        }
    }

    async fn get_delivery_status(&self, message_id: &str) -> Result<String, SmsError> {
        let request = self.request("GetDelivery").query("MessageID", message_id);

        match self.submit(request).await {
            Ok(payload) => {
                let raw = payload["Data"]["DeliveryType"]
                    .as_i64()
                    .unwrap_or(i64::from(INITIAL_STATUS));

                self.recorder.update_status(message_id, raw as i32).await;

                Ok(DeliveryStatus::title_from_code(raw).to_string())
            }
            Err(cause) => {
                error!("amootsms: delivery status query failed for {message_id}: {cause}");
                Err(SmsError::provider("error retrieving delivery status", cause))
            }
        }
    }

    async fn get_credit_balance(&self) -> Result<f64, SmsError> {
        let request = self.request("AccountStatus");

        match self.submit(request).await {
            // Default to 0 if the balance field is missing.
            Ok(payload) => Ok(payload["RemaindCredit"].as_f64().unwrap_or(0.0)),
            Err(cause) => {
                error!("amootsms: credit query failed: {cause}");
                Err(SmsError::provider("error retrieving credit balance", cause))
            }
        }
    }

    async fn send_patterned(
        &self,
        recipient: &str,
        pattern_code: &str,
        values: &[(String, String)],
    ) -> Result<String, SmsError> {
        // Positional vendor: only the values are sent, comma-joined.
        let pattern_values = values
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let request = self
            .request("SendWithPattern")
            .query("Mobile", recipient)
            .query("PatternCodeID", pattern_code)
            .query("PatternValues", pattern_values);

        let message_id = match self.submit(request).await {
            Ok(payload) => value_to_string(&payload["Data"][0]["MessageID"])
                .ok_or_else(|| UNSUCCESSFUL_API_STATUS.to_string()),
            Err(cause) => Err(cause),
        };

        match message_id {
            Ok(message_id) => {
                info!(
                    "amootsms: patterned SMS to {} accepted with message ID {message_id}",
                    mask_phone(recipient)
                );
                self.recorder
                    .record(
                        PROVIDER,
                        &message_id,
                        recipient,
                        INITIAL_STATUS,
                        None,
                        Some(pattern_code),
                        None,
                    )
                    .await;
                Ok(message_id)
            }
            Err(cause) => {
                error!(
                    "amootsms: failed to send patterned SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending patterned SMS", cause))
            }
        }
    }
}
