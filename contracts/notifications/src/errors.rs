use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- Lifecycle (1–2) ---
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // --- Authorization (3–4) ---
    NotAuthorized = 3,
    SenderNotAuthorized = 4,

    // --- Capacity & rate (5–6) ---
    MaxSendersReached = 5,
    RateLimitExceeded = 6,

    // --- Input validation (7–12) ---
    TitleTooLong = 7,
    MessageTooLong = 8,
    BatchTooLarge = 9,
    RecipientsEmpty = 10,
    TooManyEnabledTypes = 11,
    InvalidLimit = 12,

    // --- Not found (13–14) ---
    NotificationNotFound = 13,
    SenderNotFound = 14,

    // --- State transitions (15–16) ---
    AlreadyRead = 15,
    AlreadyArchived = 16,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn get_suggestion(error: Error) -> Symbol {
    match error {
        Error::NotAuthorized | Error::SenderNotAuthorized => symbol_short!("CHK_AUTH"),
        Error::RateLimitExceeded => symbol_short!("RE_TRY_L"),
        Error::TitleTooLong | Error::MessageTooLong => symbol_short!("SHORTEN"),
        Error::BatchTooLarge | Error::TooManyEnabledTypes | Error::InvalidLimit => {
            symbol_short!("REDUCE")
        }
        Error::NotificationNotFound | Error::SenderNotFound => symbol_short!("CHK_ID"),
        Error::MaxSendersReached => symbol_short!("CLN_OLD"),
        Error::AlreadyRead | Error::AlreadyArchived => symbol_short!("CHK_STATE"),
        _ => symbol_short!("CONTACT"),
    }
}
