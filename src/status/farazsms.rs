//! Farazsms (ippanel) delivery statuses

/// Farazsms delivery state, normalized from the vendor's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Send,
    Pending,
    Delivered,
    Failed,
    Discarded,
    Unknown,
}

impl DeliveryStatus {
    /// Map a vendor code. Total: unrecognized codes are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Send,
            1 => Self::Pending,
            2 => Self::Delivered,
            3 => Self::Failed,
            4 => Self::Discarded,
            _ => Self::Unknown,
        }
    }

    /// The vendor code; `Unknown` persists as 99.
    pub fn code(&self) -> i64 {
        match self {
            Self::Send => 0,
            Self::Pending => 1,
            Self::Delivered => 2,
            Self::Failed => 3,
            Self::Discarded => 4,
            Self::Unknown => 99,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Send => "Send",
            Self::Pending => "Pending",
            Self::Delivered => "Delivered",
            Self::Failed => "Failed",
            Self::Discarded => "Discarded",
            Self::Unknown => "Unknown",
        }
    }

    pub fn title_from_code(code: i64) -> &'static str {
        Self::from_code(code).title()
    }
}
