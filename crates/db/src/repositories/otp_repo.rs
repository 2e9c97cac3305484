//! Repository for the `otps` table.

use locker_core::status::OtpStatus;
use locker_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor};

use crate::models::otp::{NewOtp, Otp};

const COLUMNS: &str = "\
    id, phone, parcel_id, otp_ref, otp_hash, status_id, expires_at, verified_at, \
    created_at, updated_at";

/// Provides persistence for one-time passwords.
pub struct OtpRepo;

impl OtpRepo {
    /// Insert an `ACTIVE` OTP.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &NewOtp,
    ) -> Result<Otp, sqlx::Error> {
        let query = format!(
            "INSERT INTO otps (phone, parcel_id, otp_ref, otp_hash, status_id, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Otp>(&query)
            .bind(&input.phone)
            .bind(input.parcel_id)
            .bind(&input.otp_ref)
            .bind(&input.otp_hash)
            .bind(OtpStatus::Active.id())
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Lock the OTP issued to `phone` under `otp_ref`.
    pub async fn find_by_ref_for_update(
        conn: &mut PgConnection,
        phone: &str,
        otp_ref: &str,
    ) -> Result<Option<Otp>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM otps WHERE otp_ref = $1 AND phone = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Otp>(&query)
            .bind(otp_ref)
            .bind(phone)
            .fetch_optional(conn)
            .await
    }

    pub async fn mark_verified(
        conn: &mut PgConnection,
        id: DbId,
        verified_at: Timestamp,
    ) -> Result<Otp, sqlx::Error> {
        let query = format!(
            "UPDATE otps SET status_id = $2, verified_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Otp>(&query)
            .bind(id)
            .bind(OtpStatus::Verified.id())
            .bind(verified_at)
            .fetch_one(conn)
            .await
    }

    pub async fn mark_expired(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE otps SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(OtpStatus::Expired.id())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Expire every `ACTIVE` OTP bound to a parcel. Returns how many changed.
    pub async fn expire_active_by_parcel(
        conn: &mut PgConnection,
        parcel_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE otps SET status_id = $2 WHERE parcel_id = $1 AND status_id = $3",
        )
        .bind(parcel_id)
        .bind(OtpStatus::Expired.id())
        .bind(OtpStatus::Active.id())
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
