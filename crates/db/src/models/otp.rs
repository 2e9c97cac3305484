use locker_core::status::OtpStatus;
use locker_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `otps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Otp {
    pub id: DbId,
    pub phone: String,
    pub parcel_id: Option<DbId>,
    pub otp_ref: String,
    #[serde(skip_serializing)]
    pub otp_hash: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: OtpStatus,
    pub expires_at: Timestamp,
    pub verified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values for inserting a new `ACTIVE` OTP.
#[derive(Debug, Clone)]
pub struct NewOtp {
    pub phone: String,
    pub parcel_id: Option<DbId>,
    pub otp_ref: String,
    pub otp_hash: String,
    pub expires_at: Timestamp,
}
