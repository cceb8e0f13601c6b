//! Response value types for SMS operations
//!
//! [`SmsResponse`] is the immutable per-recipient outcome of a send or
//! status attempt. [`SmsMultiResponse`] collects one response per recipient
//! in insertion order, so a multi-recipient dispatch can report every
//! outcome instead of stopping at the first failure.

use std::fmt;

use serde::Serialize;

/// Outcome of a single SMS operation for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsResponse {
    successful: bool,
    message: String,
    recipient: String,
    message_id: Option<String>,
}

impl SmsResponse {
    /// Create a new response.
    ///
    /// `message_id` is present only when the operation succeeded and the
    /// vendor returned an identifier.
    pub fn new(
        successful: bool,
        message: impl Into<String>,
        recipient: impl Into<String>,
        message_id: Option<String>,
    ) -> Self {
        Self {
            successful,
            message: message.into(),
            recipient: recipient.into(),
            message_id,
        }
    }

    /// Whether the SMS was successfully handed to the provider.
    pub fn is_ok(&self) -> bool {
        self.successful
    }

    /// The message or diagnostic text from the operation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The recipient of the SMS.
    ///
    /// For delivery-status queries this field carries the message id
    /// instead of a phone number, a field reuse kept for compatibility.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// The vendor message id, when one was returned.
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }
}

impl fmt::Display for SmsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recipient: {}, Message: {}", self.recipient, self.message)
    }
}

/// Responses for a multi-recipient dispatch, keyed by recipient and kept in
/// insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SmsMultiResponse {
    responses: Vec<(String, SmsResponse)>,
}

impl SmsMultiResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the response for a recipient.
    pub fn insert(&mut self, recipient: impl Into<String>, response: SmsResponse) {
        let recipient = recipient.into();
        if let Some(entry) = self.responses.iter_mut().find(|(r, _)| *r == recipient) {
            entry.1 = response;
        } else {
            self.responses.push((recipient, response));
        }
    }

    /// Look up the response for a recipient.
    pub fn get(&self, recipient: &str) -> Option<&SmsResponse> {
        self.responses
            .iter()
            .find(|(r, _)| r == recipient)
            .map(|(_, response)| response)
    }

    /// Iterate over `(recipient, response)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SmsResponse)> {
        self.responses
            .iter()
            .map(|(r, response)| (r.as_str(), response))
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// True iff every contained response is successful. Vacuously true for
    /// an empty collection.
    pub fn all_ok(&self) -> bool {
        self.responses.iter().all(|(_, response)| response.is_ok())
    }
}

impl fmt::Display for SmsMultiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (recipient, response) in self.iter() {
            if !first {
                writeln!(f)?;
            }
            write!(f, "Recipient: {recipient}, Response: {response}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(recipient: &str) -> SmsResponse {
        SmsResponse::new(true, "sent", recipient, Some("42".to_string()))
    }

    fn failed(recipient: &str) -> SmsResponse {
        SmsResponse::new(false, "boom", recipient, None)
    }

    #[test]
    fn all_ok_is_vacuously_true_for_empty() {
        assert!(SmsMultiResponse::new().all_ok());
    }

    #[test]
    fn all_ok_requires_every_response_successful() {
        let mut multi = SmsMultiResponse::new();
        multi.insert("+15550001", ok("+15550001"));
        multi.insert("+15550002", ok("+15550002"));
        assert!(multi.all_ok());

        multi.insert("+15550003", failed("+15550003"));
        assert!(!multi.all_ok());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut multi = SmsMultiResponse::new();
        multi.insert("b", ok("b"));
        multi.insert("a", ok("a"));
        let order: Vec<&str> = multi.iter().map(|(r, _)| r).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn insert_replaces_existing_recipient() {
        let mut multi = SmsMultiResponse::new();
        multi.insert("a", ok("a"));
        multi.insert("a", failed("a"));
        assert_eq!(multi.len(), 1);
        assert!(!multi.all_ok());
    }

    #[test]
    fn display_includes_recipient_and_message() {
        let response = failed("+15550001");
        assert_eq!(
            response.to_string(),
            "Recipient: +15550001, Message: boom"
        );
    }
}
