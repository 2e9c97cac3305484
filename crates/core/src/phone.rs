//! Phone number validation and log masking.

use crate::codes::is_numeric;
use crate::error::CoreError;

/// Minimum accepted phone length (digits).
pub const MIN_PHONE_LEN: usize = 9;

/// Maximum accepted phone length (digits).
pub const MAX_PHONE_LEN: usize = 15;

/// `true` when the phone is 9-15 ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    (MIN_PHONE_LEN..=MAX_PHONE_LEN).contains(&phone.len()) && is_numeric(phone)
}

/// Validate a phone, naming the offending field in the error.
pub fn validate_phone(field: &str, phone: &str) -> Result<(), CoreError> {
    if phone.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if !is_valid_phone(phone) {
        return Err(CoreError::Validation(format!("invalid {field} format")));
    }
    Ok(())
}

/// Mask all but the last four digits for logging.
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        return "****".to_string();
    }
    format!("****{}", &phone[phone.len() - 4..])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_length_bounds() {
        assert!(is_valid_phone("081234567"));
        assert!(is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("08123456"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("08-1234567"));
    }

    #[test]
    fn validate_phone_names_field() {
        let err = validate_phone("receiver_phone", "").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "receiver_phone is required");
        assert!(validate_phone("phone", "0812345678").is_ok());
    }

    #[test]
    fn masks_all_but_last_four() {
        assert_eq!(mask_phone("0812345678"), "****5678");
        assert_eq!(mask_phone("123"), "****");
    }
}
