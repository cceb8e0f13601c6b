//! Twilio driver
//!
//! Form-encoded API with basic auth (account SID + auth token). Twilio is
//! the one vendor whose delivery codes are strings, so the stable numeric
//! form is what gets persisted. Pattern sends are not supported.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::config::DriverSettings;
use crate::drivers::{fetch_json, value_to_f64, SmsDriver, UNSUCCESSFUL_API_STATUS};
use crate::error::SmsError;
use crate::http::{HttpRequest, HttpTransport};
use crate::log::SmsRecorder;
use crate::redaction::mask_phone;
use crate::status::twilio::DeliveryStatus;

const DEFAULT_BASE_URL: &str = "https://api.twilio.com/2010-04-01";
const PROVIDER: &str = "twilio";

pub struct TwilioDriver {
    account_sid: String,
    auth_token: String,
    base_url: String,
    recorder: SmsRecorder,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for TwilioDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioDriver")
            .field("account_sid", &self.account_sid)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TwilioDriver {
    pub fn new(
        settings: &DriverSettings,
        recorder: SmsRecorder,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, SmsError> {
        Ok(Self {
            account_sid: settings.require("account_sid")?.to_string(),
            auth_token: settings.require("auth_token")?.to_string(),
            base_url: settings
                .get("base_url")
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            recorder,
            transport,
        })
    }

    fn account_url(&self, resource: &str) -> String {
        format!("{}/Accounts/{}/{resource}", self.base_url, self.account_sid)
    }

    fn authed(&self, request: HttpRequest) -> HttpRequest {
        request.basic_auth(&self.account_sid, &self.auth_token)
    }
}

#[async_trait]
impl SmsDriver for TwilioDriver {
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
            .authed(HttpRequest::post(self.account_url("Messages.json")))
            .form(vec![
                ("From".to_string(), sender.to_string()),
                ("To".to_string(), recipient.to_string()),
                ("Body".to_string(), message.to_string()),
            ]);

        // Twilio answers message creation with 201.
        let outcome = match fetch_json(self.transport.as_ref(), request, 201).await {
            Ok(payload) => match payload["sid"].as_str() {
                Some(sid) => {
                    let status = DeliveryStatus::from_code(
                        payload["status"].as_str().unwrap_or_default(),
                    );
                    Ok((sid.to_string(), status.to_numeric_code()))
                }
                None => Err(UNSUCCESSFUL_API_STATUS.to_string()),
            },
            Err(cause) => Err(cause),
        };

        match outcome {
            Ok((message_id, numeric_status)) => {
                self.recorder
                    .record(
                        PROVIDER,
                        &message_id,
                        recipient,
                        numeric_status,
                        Some(message),
                        None,
                        Some(sender),
                    )
                    .await;
                Ok(message_id)
            }
            Err(cause) => {
                error!(
                    "twilio: failed to send SMS to {}: {cause}",
                    mask_phone(recipient)
                );
                Err(SmsError::provider("error sending simple SMS", cause))
            }
        }
    }

    async fn get_delivery_status(&self, message_id: &str) -> Result<String, SmsError> {
        let request = self.authed(HttpRequest::get(
            self.account_url(&format!("Messages/{message_id}.json")),
        ));

        let outcome = match fetch_json(self.transport.as_ref(), request, 200).await {
            Ok(payload) => match payload["status"].as_str() {
                Some(code) => Ok(DeliveryStatus::from_code(code).to_numeric_code()),
                None => Err(UNSUCCESSFUL_API_STATUS.to_string()),
            },
            Err(cause) => Err(cause),
        };

        match outcome {
            Ok(numeric_status) => {
                self.recorder.update_status(message_id, numeric_status).await;

                Ok(DeliveryStatus::from_numeric_code(numeric_status)
                    .title()
                    .to_string())
            }
            Err(cause) => {
                error!("twilio: delivery status query failed for {message_id}: {cause}");
                Err(SmsError::provider("error retrieving delivery status", cause))
            }
        }
    }

    async fn get_credit_balance(&self) -> Result<f64, SmsError> {
        let request = self.authed(HttpRequest::get(self.account_url("Balance.json")));

        let outcome = match fetch_json(self.transport.as_ref(), request, 200).await {
            // Twilio reports the balance as a decimal string.
            Ok(payload) => match payload.get("balance").and_then(value_to_f64) {
                Some(balance) => Ok(balance),
                None => Err(UNSUCCESSFUL_API_STATUS.to_string()),
            },
            Err(cause) => Err(cause),
        };

        match outcome {
            Ok(balance) => Ok(balance),
            Err(cause) => {
                error!("twilio: credit query failed: {cause}");
                Err(SmsError::provider("error retrieving credit balance", cause))
            }
        }
    }

    async fn send_patterned(
        &self,
        _recipient: &str,
        _pattern_code: &str,
        _values: &[(String, String)],
    ) -> Result<String, SmsError> {
        warn!("twilio: patterned send requested but not supported");
        Err(SmsError::Unsupported {
            driver: PROVIDER,
            operation: "patterned send",
        })
    }
}
