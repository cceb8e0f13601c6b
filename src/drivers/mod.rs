//! Provider driver adapters
//!
//! One capability contract, four implementations. Each adapter owns the
//! protocol details for its vendor -- endpoint, verb, auth scheme, request
//! shape, the success discriminant in the payload and the path to the
//! message identifier -- and nothing else. Collaborators (log recorder,
//! HTTP transport) are injected at construction.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{DriverKind, DriverSettings};
use crate::error::SmsError;
use crate::http::{HttpRequest, HttpTransport};
use crate::log::SmsRecorder;

pub mod amootsms;
pub mod farazsms;
pub mod smsir;
pub mod twilio;

pub use amootsms::AmootsmsDriver;
pub use farazsms::FarazsmsDriver;
pub use smsir::SmsIrDriver;
pub use twilio::TwilioDriver;

#[cfg(test)]
mod tests;

/// Contract every provider adapter implements.
#[async_trait]
pub trait SmsDriver: Send + Sync {
    /// Short provider name used for log records and diagnostics.
    fn provider_name(&self) -> &'static str;

    /// Send a plain text message. Returns the vendor message id and records
    /// the send in the log store before returning.
    async fn send(&self, recipient: &str, message: &str, sender: &str)
        -> Result<String, SmsError>;

    /// Query delivery state for a sent message. Updates the stored record
    /// and returns the normalized status title.
    async fn get_delivery_status(&self, message_id: &str) -> Result<String, SmsError>;

    /// Remaining credit balance. Returns 0 only when the vendor reports
    /// success but omits the balance field.
    async fn get_credit_balance(&self) -> Result<f64, SmsError>;

    /// Send a vendor-side templated message. Values are ordered
    /// `(name, value)` pairs; positional vendors use the values in order.
    async fn send_patterned(
        &self,
        recipient: &str,
        pattern_code: &str,
        values: &[(String, String)],
    ) -> Result<String, SmsError>;
}

/// Instantiate the adapter for a configured driver kind.
pub fn build_driver(
    kind: DriverKind,
    settings: &DriverSettings,
    recorder: SmsRecorder,
    transport: Arc<dyn HttpTransport>,
) -> Result<Box<dyn SmsDriver>, SmsError> {
    Ok(match kind {
        DriverKind::Twilio => Box::new(TwilioDriver::new(settings, recorder, transport)?),
        DriverKind::Farazsms => Box::new(FarazsmsDriver::new(settings, recorder, transport)?),
        DriverKind::SmsIr => Box::new(SmsIrDriver::new(settings, recorder, transport)?),
        DriverKind::Amootsms => Box::new(AmootsmsDriver::new(settings, recorder, transport)?),
    })
}

/// Vendor payload signaled failure or lacked the expected fields.
pub(crate) const UNSUCCESSFUL_API_STATUS: &str =
    "API returned an unsuccessful status or missing data";

/// Execute a request and parse the JSON payload.
///
/// The three failure classes stay distinguishable in the returned cause
/// text: transport failure, unexpected HTTP status, malformed payload.
pub(crate) async fn fetch_json(
    transport: &dyn HttpTransport,
    request: HttpRequest,
    expected_status: u16,
) -> Result<Value, String> {
    let response = transport
        .execute(request)
        .await
        .map_err(|e| format!("transport failure: {e}"))?;

    if response.status != expected_status {
        return Err(format!(
            "failed to retrieve a successful response from the API (HTTP {})",
            response.status
        ));
    }

    serde_json::from_str(&response.body).map_err(|e| format!("malformed response payload: {e}"))
}

/// Vendor message ids arrive as JSON strings or numbers.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Balance fields arrive as JSON numbers or numeric strings.
pub(crate) fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
