//! Amootsms delivery statuses
//!
//! Amootsms has the widest code space of the supported vendors, including
//! operator-side routing states and input-validation rejections.

/// Amootsms delivery state, normalized from the vendor's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    SendToTci,
    ReceivedByPhone,
    NotReceivedByPhone,
    TciError,
    UnknownError,
    TciReceived,
    NotTciReceived,
    BlackList,
    Unknown,
    Sent,
    Filtered,
    SendingList,
    NoReceipt,
    SendWithAvanak,
    SendWithBackupVtel,
    SendingQueue,
    WrongNumber,
    EmptyMessage,
    ShortCodeInvalid,
}

impl DeliveryStatus {
    /// Map a vendor code. Total: unrecognized codes are `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::SendToTci,
            1 => Self::ReceivedByPhone,
            2 => Self::NotReceivedByPhone,
            3 => Self::TciError,
            5 => Self::UnknownError,
            8 => Self::TciReceived,
            16 => Self::NotTciReceived,
            35 => Self::BlackList,
            100 => Self::Unknown,
            200 => Self::Sent,
            300 => Self::Filtered,
            400 => Self::SendingList,
            500 => Self::NoReceipt,
            501 => Self::SendWithAvanak,
            502 => Self::SendWithBackupVtel,
            900 => Self::SendingQueue,
            950 => Self::WrongNumber,
            951 => Self::EmptyMessage,
            952 => Self::ShortCodeInvalid,
            _ => Self::Unknown,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SendToTci => "Sent to TCI",
            Self::ReceivedByPhone => "Received by phone",
            Self::NotReceivedByPhone => "Not received by phone",
            Self::TciError => "TCI error",
            Self::UnknownError => "Unknown error",
            Self::TciReceived => "Received by TCI",
            Self::NotTciReceived => "Not received by TCI",
            Self::BlackList => "Blacklisted",
            Self::Unknown => "Unknown",
            Self::Sent => "Sent",
            Self::Filtered => "Filtered",
            Self::SendingList => "In sending list",
            Self::NoReceipt => "No receipt",
            Self::SendWithAvanak => "Sent with Avanak",
            Self::SendWithBackupVtel => "Sent with backup Vtel",
            Self::SendingQueue => "In sending queue",
            Self::WrongNumber => "Wrong number",
            Self::EmptyMessage => "Empty message",
            Self::ShortCodeInvalid => "Invalid shortcode",
        }
    }

    pub fn title_from_code(code: i64) -> &'static str {
        Self::from_code(code).title()
    }
}
