//! Error types for the SMS gateway
//!
//! One enum covers the whole crate. The variants split along the lines
//! callers care about: configuration and request mistakes propagate as
//! faults, provider and capability failures are caught by the dispatch
//! paths and turned into unsuccessful responses.

use thiserror::Error;

/// Errors produced by the gateway and its drivers.
#[derive(Debug, Error)]
pub enum SmsError {
    /// Unknown or disabled driver name, or a missing driver setting.
    /// Never retried; surfaced to the caller immediately.
    #[error("SMS configuration error: {0}")]
    Configuration(String),

    /// Missing recipients, missing message/pattern, or a contact object
    /// without the configured phone field. Surfaced immediately.
    #[error("Invalid SMS request: {0}")]
    InvalidRequest(String),

    /// Transport failure, non-success HTTP status, or a vendor payload
    /// signaling failure. The underlying cause is preserved in the message
    /// for diagnostics; callers treat all three identically.
    #[error("SMS provider error: {0}")]
    Provider(String),

    /// A capability the active driver does not implement. Terminal, never
    /// retried.
    #[error("Driver '{driver}' does not support {operation}")]
    Unsupported {
        driver: &'static str,
        operation: &'static str,
    },
}

impl SmsError {
    /// Wrap a driver-level cause with the operation that failed.
    pub(crate) fn provider(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::Provider(format!("{operation}: {cause}"))
    }
}
