//! Random numeric code generation.
//!
//! Backed by `rand::rng()`, a cryptographically secure thread-local generator.

use rand::Rng;

/// Prefix for public parcel codes.
pub const PARCEL_CODE_PREFIX: &str = "PR-";

/// Number of digits after [`PARCEL_CODE_PREFIX`].
pub const PARCEL_CODE_DIGITS: usize = 10;

/// Prefix for pickup codes printed on the receipt.
pub const PICKUP_CODE_PREFIX: &str = "PU-";

/// Number of digits after [`PICKUP_CODE_PREFIX`].
pub const PICKUP_CODE_DIGITS: usize = 6;

/// Generate a string of `digits` random decimal digits.
pub fn numeric_code(digits: usize) -> String {
    let mut rng = rand::rng();
    (0..digits)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Generate a unique-looking parcel code, e.g. `PR-0123456789`.
pub fn generate_parcel_code() -> String {
    format!("{PARCEL_CODE_PREFIX}{}", numeric_code(PARCEL_CODE_DIGITS))
}

/// Generate a pickup code, e.g. `PU-042917`.
pub fn generate_pickup_code() -> String {
    format!("{PICKUP_CODE_PREFIX}{}", numeric_code(PICKUP_CODE_DIGITS))
}

/// `true` when `value` is non-empty and made only of ASCII digits.
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_code_has_requested_length_and_digits_only() {
        let code = numeric_code(6);
        assert_eq!(code.len(), 6);
        assert!(is_numeric(&code));
    }

    #[test]
    fn parcel_and_pickup_codes_carry_prefixes() {
        let parcel = generate_parcel_code();
        assert!(parcel.starts_with("PR-"));
        assert_eq!(parcel.len(), 3 + PARCEL_CODE_DIGITS);

        let pickup = generate_pickup_code();
        assert!(pickup.starts_with("PU-"));
        assert!(is_numeric(&pickup[3..]));
    }

    #[test]
    fn is_numeric_rejects_empty_and_letters() {
        assert!(!is_numeric(""));
        assert!(!is_numeric("12a4"));
        assert!(is_numeric("0000"));
    }
}
