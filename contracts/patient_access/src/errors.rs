use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- Lifecycle (1–3) ---
    AlreadyInitialized = 1,
    NotInitialized = 2,
    ContractPaused = 3,

    // --- Authorization (4–6) ---
    NotAuthorized = 4,
    UserInactive = 5,
    RoleMismatch = 6,

    // --- Share tokens (7–10) ---
    TokenExists = 7,
    TokenNotFound = 8,
    TokenRevoked = 9,
    InvalidTtl = 10,

    // --- Input validation (11–14) ---
    NameTooLong = 11,
    EmailTooLong = 12,
    MobileTooLong = 13,
    InvalidPageSize = 14,

    // --- Not found (15–16) ---
    UserNotFound = 15,
    NotCached = 16,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn get_suggestion(error: Error) -> Symbol {
    match error {
        Error::NotAuthorized | Error::UserInactive | Error::RoleMismatch => {
            symbol_short!("CHK_AUTH")
        }
        Error::TokenExists => symbol_short!("NEW_TOK"),
        Error::TokenNotFound | Error::TokenRevoked => symbol_short!("RESCAN"),
        Error::InvalidTtl => symbol_short!("CHK_TTL"),
        Error::NameTooLong | Error::EmailTooLong | Error::MobileTooLong => {
            symbol_short!("SHORTEN")
        }
        Error::InvalidPageSize => symbol_short!("REDUCE"),
        Error::UserNotFound | Error::NotCached => symbol_short!("CHK_ID"),
        _ => symbol_short!("CONTACT"),
    }
}
