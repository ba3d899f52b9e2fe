use soroban_sdk::{contracterror, symbol_short, Symbol};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // --- Lifecycle (1–2) ---
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // --- Authorization (3) ---
    NotAuthorized = 3,

    // --- Input validation (4–9) ---
    EmptyTitle = 4,
    TitleTooLong = 5,
    EmptyDataRef = 6,
    InvalidDataRefLength = 7,
    UnsupportedMimeType = 8,
    FileTooLarge = 9,

    // --- Not found (10–11) ---
    RecordNotFound = 10,
    TicketNotFound = 11,

    // --- State (12–13) ---
    RecordArchived = 12,
    RecordLimitReached = 13,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn get_suggestion(error: Error) -> Symbol {
    match error {
        Error::NotAuthorized => symbol_short!("CHK_AUTH"),
        Error::EmptyTitle | Error::TitleTooLong => symbol_short!("SHORTEN"),
        Error::EmptyDataRef | Error::InvalidDataRefLength => symbol_short!("CHK_REF"),
        Error::UnsupportedMimeType => symbol_short!("CHK_MIME"),
        Error::FileTooLarge => symbol_short!("REDUCE"),
        Error::RecordNotFound | Error::TicketNotFound => symbol_short!("CHK_ID"),
        Error::RecordArchived => symbol_short!("RESTORE"),
        Error::RecordLimitReached => symbol_short!("CLN_OLD"),
        _ => symbol_short!("CONTACT"),
    }
}
