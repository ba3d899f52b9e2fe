//! Input validation for uploaded record metadata.
//!
//! Bounds are enforced before anything is written so the vault never holds
//! a record it cannot list or ticket.

use soroban_sdk::{vec, Env, String};

use crate::errors::Error;

/// Maximum length for record display titles.
pub const MAX_TITLE_LEN: u32 = 120;

/// Object-store key bounds (shortest real key is a content digest prefix).
pub const MIN_DATA_REF_LEN: u32 = 10;
pub const MAX_DATA_REF_LEN: u32 = 200;

/// Upload ceiling: 25 MiB, matching the object-store policy.
pub const MAX_FILE_BYTES: u64 = 26_214_400;

pub fn validate_title(title: &String) -> Result<(), Error> {
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(Error::TitleTooLong);
    }
    Ok(())
}

pub fn validate_data_ref(data_ref: &String) -> Result<(), Error> {
    if data_ref.is_empty() {
        return Err(Error::EmptyDataRef);
    }
    let len = data_ref.len();
    if !(MIN_DATA_REF_LEN..=MAX_DATA_REF_LEN).contains(&len) {
        return Err(Error::InvalidDataRefLength);
    }
    Ok(())
}

/// Media types the preview/download pipeline can serve. Exact match; the
/// uploader normalizes parameters (e.g. charset) off-chain.
pub fn validate_mime_type(env: &Env, mime_type: &String) -> Result<(), Error> {
    let allowed = vec![
        env,
        String::from_str(env, "application/pdf"),
        String::from_str(env, "image/png"),
        String::from_str(env, "image/jpeg"),
        String::from_str(env, "image/webp"),
        String::from_str(env, "text/plain"),
        String::from_str(env, "application/dicom"),
    ];
    if !allowed.contains(mime_type) {
        return Err(Error::UnsupportedMimeType);
    }
    Ok(())
}

pub fn validate_size(size_bytes: u64) -> Result<(), Error> {
    if size_bytes == 0 || size_bytes > MAX_FILE_BYTES {
        return Err(Error::FileTooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{Env, String};

    #[test]
    fn test_validate_title() {
        let env = Env::default();
        assert!(validate_title(&String::from_str(&env, "Blood panel 2026")).is_ok());
        assert_eq!(
            validate_title(&String::from_str(&env, "")),
            Err(Error::EmptyTitle)
        );
        // 121 bytes — one over the ceiling.
        let long = String::from_bytes(&env, &[b'a'; 121]);
        assert_eq!(validate_title(&long), Err(Error::TitleTooLong));
    }

    #[test]
    fn test_validate_data_ref() {
        let env = Env::default();
        assert!(validate_data_ref(&String::from_str(&env, "vault/2026/08/scan-0042.pdf")).is_ok());
        assert_eq!(
            validate_data_ref(&String::from_str(&env, "short")),
            Err(Error::InvalidDataRefLength)
        );
        assert_eq!(
            validate_data_ref(&String::from_str(&env, "")),
            Err(Error::EmptyDataRef)
        );
    }

    #[test]
    fn test_validate_mime_type() {
        let env = Env::default();
        assert!(validate_mime_type(&env, &String::from_str(&env, "application/pdf")).is_ok());
        assert_eq!(
            validate_mime_type(&env, &String::from_str(&env, "application/x-msdownload")),
            Err(Error::UnsupportedMimeType)
        );
    }

    #[test]
    fn test_validate_size() {
        assert!(validate_size(1024).is_ok());
        assert_eq!(validate_size(0), Err(Error::FileTooLarge));
        assert_eq!(validate_size(MAX_FILE_BYTES + 1), Err(Error::FileTooLarge));
    }
}
