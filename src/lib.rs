//! Multi-provider SMS gateway
//!
//! One sending API over interchangeable provider adapters (Twilio,
//! Farazsms, SMS.ir, Amootsms). The gateway resolves a configured driver,
//! fans a request out to every recipient, and wraps the network call with
//! caching, retry, and redacted message logging. Capabilities beyond plain
//! sending (pattern sends, delivery status, credit balance) are part of
//! the driver contract; a driver that lacks one reports it instead of
//! faking it.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sms_gateway::{
//!     Cache, DriverKind, DriverSettings, GatewayConfig, InMemoryCache,
//!     InMemoryLogStore, ReqwestTransport, SmsGateway, SmsLogStore, SmsRequest,
//! };
//!
//! # async fn run() -> Result<(), sms_gateway::SmsError> {
//! let config = GatewayConfig {
//!     default_driver: "farazsms".to_string(),
//!     ..GatewayConfig::default()
//! }
//! .driver(
//!     "farazsms",
//!     DriverKind::Farazsms,
//!     DriverSettings::new().with("api_key", "...").sender("3000"),
//! );
//!
//! let gateway = SmsGateway::new(
//!     config,
//!     Arc::new(InMemoryCache::new()) as Arc<dyn Cache>,
//!     Arc::new(InMemoryLogStore::new()) as Arc<dyn SmsLogStore>,
//!     Arc::new(ReqwestTransport::new()),
//! );
//!
//! let request = SmsRequest::builder()
//!     .to("+15550001")
//!     .message("Hello from the gateway")
//!     .build();
//! let responses = gateway.send(&request).await?;
//! assert!(responses.all_ok());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod drivers;
pub mod error;
pub mod http;
pub mod log;
pub mod redaction;
pub mod response;
pub mod service;
pub mod status;

#[cfg(test)]
pub(crate) mod test_util;

pub use cache::{Cache, InMemoryCache, RedisCache};
pub use config::{DriverEntry, DriverKind, DriverSettings, GatewayConfig};
pub use drivers::{build_driver, SmsDriver};
pub use error::SmsError;
pub use http::{
    HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    TransportError,
};
pub use log::{InMemoryLogStore, SmsLogEntry, SmsLogStore, SmsRecorder};
pub use redaction::{default_rules, mask_phone, redact, RedactionRule};
pub use response::{SmsMultiResponse, SmsResponse};
pub use service::{MessageContent, Recipient, SmsGateway, SmsRequest, SmsRequestBuilder};
