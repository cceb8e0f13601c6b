//! SMS.ir (Idehpardazan) driver
//!
//! JSON API authenticated with an `X-API-KEY` header. Success is signaled
//! by `status == 1` in the payload.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config::DriverSettings;
use crate::drivers::{fetch_json, value_to_string, SmsDriver, UNSUCCESSFUL_API_STATUS};
use crate::error::SmsError;
use crate::http::{HttpRequest, HttpTransport};
use crate::log::SmsRecorder;
use crate::redaction::mask_phone;
use crate::status::smsir::DeliveryStatus;

const DEFAULT_BASE_URL: &str = "https://api.sms.ir/v1";
const PROVIDER: &str = "smsir";

pub struct SmsIrDriver {
    api_key: String,
    base_url: String,
    recorder: SmsRecorder,
    transport: Arc<dyn HttpTransport>,
}

impl SmsIrDriver {
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
            .header("X-API-KEY", &self.api_key)
    }

    async fn submit(&self, request: HttpRequest) -> Result<Value, String> {
        let payload = fetch_json(self.transport.as_ref(), request, 200).await?;

        if payload["status"] == 1 {
            return Ok(payload);
        }

        Err(UNSUCCESSFUL_API_STATUS.to_string())
    }
}

#[async_trait]
impl SmsDriver for SmsIrDriver {
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
            .request(HttpRequest::post(format!("{}/send/bulk", self.base_url)))
            .json(json!({
                "MessageText": message,
                "LineNumber": sender,
                "Mobiles": [recipient],
            }));

        let message_id = match self.submit(request).await {
            Ok(payload) => value_to_string(&payload["data"]["messageIds"][0])
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
                    "smsir: failed to send SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending simple SMS", cause))
            }
        }
    }

    async fn get_delivery_status(&self, message_id: &str) -> Result<String, SmsError> {
        let request = self.request(HttpRequest::get(format!(
            "{}/send/{message_id}",
            self.base_url
        )));

        match self.submit(request).await {
            Ok(payload) => {
                let raw = payload["data"]["deliveryState"].as_i64().unwrap_or(8);

                self.recorder.update_status(message_id, raw as i32).await;

                Ok(DeliveryStatus::title_from_code(raw).to_string())
            }
            Err(cause) => {
                error!("smsir: delivery status query failed for {message_id}: {cause}");
                Err(SmsError::provider("error retrieving delivery status", cause))
            }
        }
    }

    async fn get_credit_balance(&self) -> Result<f64, SmsError> {
        let request = self.request(HttpRequest::get(format!("{}/credit", self.base_url)));

        match self.submit(request).await {
            // The credit arrives directly in `data`; default to 0 if absent.
            Ok(payload) => Ok(payload["data"].as_f64().unwrap_or(0.0)),
            Err(cause) => {
                error!("smsir: credit query failed: {cause}");
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
        let parameters: Vec<Value> = values
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();

        let request = self
            .request(HttpRequest::post(format!("{}/send/verify", self.base_url)))
            .json(json!({
                "mobile": recipient,
                "templateId": pattern_code,
                "parameters": parameters,
            }));

        let message_id = match self.submit(request).await {
            Ok(payload) => value_to_string(&payload["data"]["messageId"])
                .ok_or_else(|| UNSUCCESSFUL_API_STATUS.to_string()),
            Err(cause) => Err(cause),
        };

        match message_id {
            Ok(message_id) => {
                info!(
                    "smsir: patterned SMS to {} accepted with message ID {message_id}",
                    mask_phone(recipient)
                );
                self.recorder
                    .record(
                        PROVIDER,
                        &message_id,
                        recipient,
                        0,
                        None,
                        Some(pattern_code),
                        None,
                    )
                    .await;
                Ok(message_id)
            }
            Err(cause) => {
                error!(
                    "smsir: failed to send patterned SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending patterned SMS", cause))
            }
        }
    }
}
