//! SMS.ir (Idehpardazan) delivery statuses

/// SMS.ir delivery state, normalized from the vendor's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Received,
    NotReceivedByPhone,
    ReceivedByTci,
    NotReceivedByTci,
    ReceivedByOperator,
    Failed,
    BlackList,
    Unknown,
}

impl DeliveryStatus {
    /// Map a vendor code. Total: unrecognized codes are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Received,
            2 => Self::NotReceivedByPhone,
            3 => Self::ReceivedByTci,
            4 => Self::NotReceivedByTci,
            5 => Self::ReceivedByOperator,
            6 => Self::Failed,
            7 => Self::BlackList,
            8 => Self::Unknown,
            _ => Self::Unknown,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::NotReceivedByPhone => "Not Received by Phone",
            Self::ReceivedByTci => "Received by TCI",
            Self::NotReceivedByTci => "Not Received by TCI",
            Self::ReceivedByOperator => "Received by Operator",
            Self::Failed => "Failed",
            Self::BlackList => "Black List",
            Self::Unknown => "Unknown",
        }
    }

    pub fn title_from_code(code: i64) -> &'static str {
        Self::from_code(code).title()
    }
}
