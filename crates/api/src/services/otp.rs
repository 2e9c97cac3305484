//! OTP request and verification for pickup authentication.

use chrono::Duration;
use locker_core::error::CoreError;
use locker_core::otp::{self, VerifyOutcome};
use locker_core::phone::{mask_phone, validate_phone};
use locker_core::pickup_token::{issue_token, PickupTokenStore};
use locker_core::rate_limit::RateLimiter;
use locker_core::types::{DbId, Timestamp};
use locker_db::models::otp::NewOtp;
use locker_db::repositories::{OtpRepo, ParcelRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::notifications::OtpNotifier;

/// Returned to the caller after an OTP has been issued.
#[derive(Debug, Clone, Serialize)]
pub struct OtpRequested {
    pub otp_ref: String,
    pub expires_at: Timestamp,
}

/// Returned after a successful verification.
#[derive(Debug, Clone, Serialize)]
pub struct OtpVerified {
    pub verified: bool,
    pub pickup_token: String,
    pub expires_at: Timestamp,
}

/// Issue a fresh OTP for `phone` and hand the code to the notifier.
///
/// At most one request per phone per rate-limit window; a refused request
/// creates no record. When `parcel_id` is given the OTP is bound to that
/// parcel, which must belong to `phone`.
pub async fn request(
    pool: &PgPool,
    limiter: &dyn RateLimiter,
    notifier: &dyn OtpNotifier,
    phone: &str,
    parcel_id: Option<DbId>,
    ttl: Duration,
    now: Timestamp,
) -> AppResult<OtpRequested> {
    validate_phone("phone", phone)?;

    if let Some(parcel_id) = parcel_id {
        let parcel = ParcelRepo::find_by_id(pool, parcel_id)
            .await?
            .ok_or(CoreError::parcel_not_found(parcel_id))?;
        if !parcel.belongs_to(phone) {
            return Err(CoreError::Forbidden("parcel does not belong to this phone".into()).into());
        }
    }

    let code = otp::generate_otp_code();
    let mut tx = pool.begin().await?;
    let record = OtpRepo::create(
        &mut *tx,
        &NewOtp {
            phone: phone.to_string(),
            parcel_id,
            otp_ref: DbId::new_v4().to_string(),
            otp_hash: otp::hash_otp_code(&code),
            expires_at: now + ttl,
        },
    )
    .await?;

    // Only a stored OTP uses up the phone's window; a refusal rolls it back.
    if !limiter.allow(phone) {
        tracing::warn!(phone = %mask_phone(phone), "OTP request rate limited");
        return Err(CoreError::TooManyRequests.into());
    }
    tx.commit().await?;

    if let Err(e) = notifier.send_otp(phone, &code).await {
        tracing::warn!(
            phone = %mask_phone(phone),
            otp_ref = %record.otp_ref,
            error = %e,
            "OTP notification failed",
        );
    }

    tracing::info!(
        phone = %mask_phone(phone),
        otp_ref = %record.otp_ref,
        "OTP issued",
    );

    Ok(OtpRequested {
        otp_ref: record.otp_ref,
        expires_at: record.expires_at,
    })
}

/// Check a submitted code and, on success, issue a pickup token.
///
/// The lookup and status update run under a row lock in one transaction.
/// A deadline found passed is persisted as EXPIRED before `OtpExpired` is
/// returned, so later attempts never re-validate. A wrong code leaves the
/// OTP active.
pub async fn verify(
    pool: &PgPool,
    tokens: &dyn PickupTokenStore,
    phone: &str,
    otp_ref: &str,
    code: &str,
    token_ttl: Duration,
    now: Timestamp,
) -> AppResult<OtpVerified> {
    otp::validate_verify_input(phone, otp_ref, code)?;

    let mut tx = pool.begin().await?;
    let record = OtpRepo::find_by_ref_for_update(&mut tx, phone, otp_ref)
        .await?
        .ok_or(CoreError::OtpNotFound)?;

    match otp::evaluate(record.status, record.expires_at, &record.otp_hash, code, now) {
        Ok(VerifyOutcome::Verified) => {
            OtpRepo::mark_verified(&mut tx, record.id, now).await?;
            tx.commit().await?;
        }
        Ok(VerifyOutcome::Expired) => {
            OtpRepo::mark_expired(&mut tx, record.id).await?;
            tx.commit().await?;
            tracing::warn!(otp_ref = %otp_ref, "OTP verification after expiry");
            return Err(CoreError::OtpExpired.into());
        }
        Err(e) => {
            tracing::warn!(
                phone = %mask_phone(phone),
                otp_ref = %otp_ref,
                code = e.code(),
                "OTP verification rejected",
            );
            return Err(e.into());
        }
    }

    let (pickup_token, expires_at) = issue_token(tokens, phone, token_ttl, now);
    tracing::info!(phone = %mask_phone(phone), otp_ref = %otp_ref, "OTP verified");

    Ok(OtpVerified {
        verified: true,
        pickup_token,
        expires_at,
    })
}
