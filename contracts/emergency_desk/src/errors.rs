use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- Lifecycle (1–2) ---
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // --- Authorization (3–5) ---
    NotAuthorized = 3,
    OperatorNotFound = 4,
    MaxOperatorsReached = 5,

    // --- Input validation (6–12) ---
    MessageTooLong = 6,
    ContactTooLong = 7,
    LabelTooLong = 8,
    DescriptionTooLong = 9,
    LocationTooLong = 10,
    InvalidPageSize = 11,
    RateLimitExceeded = 12,

    // --- Not found (13–14) ---
    SosNotFound = 13,
    ReportNotFound = 14,

    // --- State transitions (15–17) ---
    InvalidSosTransition = 15,
    InvalidMatch = 16,
    ReportClosed = 17,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn get_suggestion(error: Error) -> Symbol {
    match error {
        Error::NotAuthorized | Error::OperatorNotFound => symbol_short!("CHK_AUTH"),
        Error::MaxOperatorsReached => symbol_short!("CLN_OLD"),
        Error::MessageTooLong
        | Error::ContactTooLong
        | Error::LabelTooLong
        | Error::DescriptionTooLong
        | Error::LocationTooLong => symbol_short!("SHORTEN"),
        Error::InvalidPageSize => symbol_short!("REDUCE"),
        Error::RateLimitExceeded => symbol_short!("RE_TRY_L"),
        Error::SosNotFound | Error::ReportNotFound => symbol_short!("CHK_ID"),
        Error::InvalidSosTransition | Error::InvalidMatch | Error::ReportClosed => {
            symbol_short!("CHK_STATE")
        }
        _ => symbol_short!("CONTACT"),
    }
}
