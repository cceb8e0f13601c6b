//! Twilio delivery statuses
//!
//! Twilio reports status as a string. The numeric code is what gets
//! persisted, so stored records do not depend on vendor wording.

/// Twilio message status, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Queued,
    Sending,
    Sent,
    Failed,
    Delivered,
    Undelivered,
    Receiving,
    Received,
    Accepted,
    Scheduled,
    Read,
    PartiallyDelivered,
    Canceled,
    Unknown,
}

impl DeliveryStatus {
    /// All defined statuses, in numeric-code order.
    pub const ALL: [DeliveryStatus; 14] = [
        Self::Queued,
        Self::Sending,
        Self::Sent,
        Self::Failed,
        Self::Delivered,
        Self::Undelivered,
        Self::Receiving,
        Self::Received,
        Self::Accepted,
        Self::Scheduled,
        Self::Read,
        Self::PartiallyDelivered,
        Self::Canceled,
        Self::Unknown,
    ];

    /// Map the status string from the live API. Total: anything
    /// unrecognized is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "queued" => Self::Queued,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "failed" => Self::Failed,
            "delivered" => Self::Delivered,
            "undelivered" => Self::Undelivered,
            "receiving" => Self::Receiving,
            "received" => Self::Received,
            "accepted" => Self::Accepted,
            "scheduled" => Self::Scheduled,
            "read" => Self::Read,
            "partially_delivered" => Self::PartiallyDelivered,
            "canceled" => Self::Canceled,
            _ => Self::Unknown,
        }
    }

    /// The vendor status string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Delivered => "delivered",
            Self::Undelivered => "undelivered",
            Self::Receiving => "receiving",
            Self::Received => "received",
            Self::Accepted => "accepted",
            Self::Scheduled => "scheduled",
            Self::Read => "read",
            Self::PartiallyDelivered => "partially_delivered",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }

    /// Stable numeric code persisted to storage.
    pub fn to_numeric_code(&self) -> i32 {
        match self {
            Self::Queued => 1,
            Self::Sending => 2,
            Self::Sent => 3,
            Self::Failed => 4,
            Self::Delivered => 5,
            Self::Undelivered => 6,
            Self::Receiving => 7,
            Self::Received => 8,
            Self::Accepted => 9,
            Self::Scheduled => 10,
            Self::Read => 11,
            Self::PartiallyDelivered => 12,
            Self::Canceled => 13,
            Self::Unknown => 14,
        }
    }

    /// Map a persisted numeric code back to a status. Total.
    pub fn from_numeric_code(code: i32) -> Self {
        match code {
            1 => Self::Queued,
            2 => Self::Sending,
            3 => Self::Sent,
            4 => Self::Failed,
            5 => Self::Delivered,
            6 => Self::Undelivered,
            7 => Self::Receiving,
            8 => Self::Received,
            9 => Self::Accepted,
            10 => Self::Scheduled,
            11 => Self::Read,
            12 => Self::PartiallyDelivered,
            13 => Self::Canceled,
            _ => Self::Unknown,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Sending => "Sending",
            Self::Sent => "Sent",
            Self::Failed => "Failed",
            Self::Delivered => "Delivered",
            Self::Undelivered => "Undelivered",
            Self::Receiving => "Receiving",
            Self::Received => "Received",
            Self::Accepted => "Accepted",
            Self::Scheduled => "Scheduled",
            Self::Read => "Read",
            Self::PartiallyDelivered => "Partially Delivered",
            Self::Canceled => "Canceled",
            Self::Unknown => "Unknown",
        }
    }
}
