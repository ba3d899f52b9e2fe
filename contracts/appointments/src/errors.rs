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

    // --- Input validation (4–8) ---
    InvalidSchedule = 4,
    InvalidDuration = 5,
    ReasonTooLong = 6,
    NotesTooLong = 7,
    InvalidPageSize = 8,

    // --- Not found (9) ---
    AppointmentNotFound = 9,

    // --- State transitions (10–11) ---
    InvalidTransition = 10,
    NotYetDue = 11,
}

/// Recovery hints surfaced to callers alongside an error.
pub fn get_suggestion(error: Error) -> Symbol {
    match error {
        Error::NotAuthorized => symbol_short!("CHK_AUTH"),
        Error::InvalidSchedule | Error::NotYetDue => symbol_short!("CHK_TIME"),
        Error::InvalidDuration => symbol_short!("CHK_DUR"),
        Error::ReasonTooLong | Error::NotesTooLong => symbol_short!("SHORTEN"),
        Error::InvalidPageSize => symbol_short!("REDUCE"),
        Error::AppointmentNotFound => symbol_short!("CHK_ID"),
        Error::InvalidTransition => symbol_short!("CHK_STATE"),
        _ => symbol_short!("CONTACT"),
    }
}
