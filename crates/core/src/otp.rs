//! One-time password rules for pickup authentication.
//!
//! Codes are six CSPRNG digits. Only their SHA-256 digest is persisted; the
//! plaintext exists long enough to reach the notifier.

use crate::codes::{is_numeric, numeric_code};
use crate::error::CoreError;
use crate::hashing::{digests_match, sha256_hex};
use crate::phone::validate_phone;
use crate::status::OtpStatus;
use crate::types::Timestamp;

/// Number of digits in an OTP code.
pub const OTP_DIGITS: usize = 6;

/// Default OTP lifetime.
pub const DEFAULT_OTP_TTL_SECS: i64 = 300;

/// Default minimum interval between OTP requests for one phone.
pub const DEFAULT_OTP_REQUEST_WINDOW_SECS: i64 = 30;

/// Default pickup-session token lifetime.
pub const DEFAULT_PICKUP_TOKEN_TTL_SECS: i64 = 900;

/// Generate a fresh six-digit code.
pub fn generate_otp_code() -> String {
    numeric_code(OTP_DIGITS)
}

/// Digest stored in place of the plaintext code.
pub fn hash_otp_code(code: &str) -> String {
    sha256_hex(code.as_bytes())
}

/// Shape checks run before any database access.
pub fn validate_verify_input(phone: &str, otp_ref: &str, code: &str) -> Result<(), CoreError> {
    if otp_ref.trim().is_empty() || code.trim().is_empty() {
        return Err(CoreError::Validation("otp_ref and otp_code are required".into()));
    }
    if code.len() != OTP_DIGITS || !is_numeric(code) {
        return Err(CoreError::Validation("otp_code must be 6 digits".into()));
    }
    validate_phone("phone", phone)
}

/// Successful outcomes of checking a stored OTP against a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code matched; mark VERIFIED and issue a pickup token.
    Verified,
    /// Deadline passed; persist EXPIRED, then report `OtpExpired`.
    Expired,
}

/// Decide what happens to a stored OTP when `code` is submitted at `now`.
///
/// Check order: already used, already expired, deadline passed, digest
/// mismatch. A mismatch leaves the OTP active.
pub fn evaluate(
    status: OtpStatus,
    expires_at: Timestamp,
    stored_hash: &str,
    code: &str,
    now: Timestamp,
) -> Result<VerifyOutcome, CoreError> {
    match status {
        OtpStatus::Verified => return Err(CoreError::OtpAlreadyUsed),
        OtpStatus::Expired => return Err(CoreError::OtpExpired),
        OtpStatus::Active => {}
    }

    if now >= expires_at {
        return Ok(VerifyOutcome::Expired);
    }

    if !digests_match(stored_hash, &hash_otp_code(code)) {
        return Err(CoreError::InvalidOtp);
    }

    Ok(VerifyOutcome::Verified)
}
