//! Farazsms (ippanel) driver
//!
//! JSON API authenticated with an `apiKey` header. Success is signaled by
//! `status == "OK"` in the payload.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::config::DriverSettings;
use crate::drivers::{fetch_json, value_to_string, SmsDriver, UNSUCCESSFUL_API_STATUS};
use crate::error::SmsError;
use crate::http::{HttpRequest, HttpTransport};
use crate::log::SmsRecorder;
use crate::redaction::mask_phone;
use crate::status::farazsms::DeliveryStatus;

const DEFAULT_BASE_URL: &str = "https://api2.ippanel.com/api/v1";
const PROVIDER: &str = "farazsms";

/// The provider offers this number as a shared line for pattern sends and
/// substitutes the most stable line available.
const PATTERN_SHARED_SENDER: &str = "3000505";

pub struct FarazsmsDriver {
    api_key: String,
    base_url: String,
    recorder: SmsRecorder,
    transport: Arc<dyn HttpTransport>,
}

impl FarazsmsDriver {
    pub fn new(
        settings: &DriverSettings,
        recorder: SmsRecorder,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, SmsError> {
        Ok(Self {
            api_key: settings.require("api_key")?.to_string(),
            base_url: settings
                .get("base_url")
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            recorder,
            transport,
        })
    }

    fn request(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("apiKey", &self.api_key)
    }

    async fn submit_send(&self, request: HttpRequest) -> Result<String, String> {
        let payload = fetch_json(self.transport.as_ref(), request, 200).await?;

        if payload["status"] == "OK" {
            if let Some(message_id) = value_to_string(&payload["data"]["message_id"]) {
                return Ok(message_id);
            }
        }

        Err(UNSUCCESSFUL_API_STATUS.to_string())
    }
}

#[async_trait]
impl SmsDriver for FarazsmsDriver {
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
            .request(HttpRequest::post(format!(
                "{}/sms/send/webservice/single",
                self.base_url
            )))
            .json(json!({
                "message": message,
                "sender": sender,
                "recipient": [recipient],
                "sending_type": "webservice",
            }));

        match self.submit_send(request).await {
            Ok(message_id) => {
                self.recorder
                    .record(
                        PROVIDER,
                        &message_id,
                        recipient,
                        0,
                        Some(message),
                        None,
                        Some(sender),
                    )
                    .await;
                Ok(message_id)
            }
            Err(cause) => {
                error!(
                    "farazsms: failed to send SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending simple SMS", cause))
            }
        }
    }

    async fn get_delivery_status(&self, message_id: &str) -> Result<String, SmsError> {
        let request = self.request(HttpRequest::get(format!(
            "{}/sms/message/show-recipient/message-id/{message_id}",
            self.base_url
        )));

        let payload = match fetch_json(self.transport.as_ref(), request, 200).await {
            Ok(payload) => payload,
            Err(cause) => {
                error!("farazsms: delivery status query failed for {message_id}: {cause}");
                return Err(SmsError::provider("error retrieving delivery status", cause));
            }
        };

        if payload["status"] == "OK" {
            // Missing deliveries entry maps to the Unknown code.
            let raw = payload["data"]["deliveries"][0]["status"]
                .as_i64()
                .unwrap_or(99);

            self.recorder.update_status(message_id, raw as i32).await;

            return Ok(DeliveryStatus::title_from_code(raw).to_string());
        }

        error!("farazsms: delivery status query failed for {message_id}: {UNSUCCESSFUL_API_STATUS}");
        Err(SmsError::provider(
            "error retrieving delivery status",
            UNSUCCESSFUL_API_STATUS,
        ))
    }

    async fn get_credit_balance(&self) -> Result<f64, SmsError> {
        let request = self.request(HttpRequest::get(format!(
            "{}/sms/accounting/credit/show",
            self.base_url
        )));

        let payload = match fetch_json(self.transport.as_ref(), request, 200).await {
            Ok(payload) => payload,
            Err(cause) => {
                error!("farazsms: credit query failed: {cause}");
                return Err(SmsError::provider("error retrieving credit balance", cause));
            }
        };

        if payload["status"] == "OK" {
            // Default to 0 if the balance field is missing.
            return Ok(payload["data"]["credit"].as_f64().unwrap_or(0.0));
        }

        error!("farazsms: credit query failed: {UNSUCCESSFUL_API_STATUS}");
        Err(SmsError::provider(
            "error retrieving credit balance",
            UNSUCCESSFUL_API_STATUS,
        ))
    }

    async fn send_patterned(
        &self,
        recipient: &str,
        pattern_code: &str,
        values: &[(String, String)],
    ) -> Result<String, SmsError> {
        let variables: Map<String, Value> = values
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();

        let request = self
            .request(HttpRequest::post(format!(
                "{}/sms/pattern/normal/send",
                self.base_url
            )))
            .json(json!({
                "recipient": recipient,
                "code": pattern_code,
                "variable": variables,
                "sender": PATTERN_SHARED_SENDER,
            }));

        match self.submit_send(request).await {
            Ok(message_id) => {
                info!(
                    "farazsms: patterned SMS to {} accepted with message ID {message_id}",
                    mask_phone(recipient)
                );
                self.recorder
                    .record(
                        PROVIDER,
                        &message_id,
                        recipient,
                        8,
                        None,
                        Some(pattern_code),
                        None,
                    )
                    .await;
                Ok(message_id)
            }
            Err(cause) => {
                error!(
                    "farazsms: failed to send patterned SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending patterned SMS", cause))
            }
        }
    }
}
