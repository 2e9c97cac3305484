//! Repository for the `parcels` table.
//!
//! Lifecycle rules live in `locker_core::parcel`; this repository only
//! persists the fields the state machine produces.

use locker_core::parcel::ParcelLifecycle;
use locker_core::status::{ParcelStatus, StatusId};
use locker_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor};

use crate::models::parcel::{NewParcel, Parcel};

const COLUMNS: &str = "\
    id, parcel_code, locker_id, compartment_id, size, sender_phone, receiver_phone, \
    pickup_code, status_id, reserved_at, deposited_at, picked_up_at, expires_at, \
    created_at, updated_at";

/// Provides persistence for parcels.
pub struct ParcelRepo;

impl ParcelRepo {
    /// Insert a parcel with its initial lifecycle fields.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &NewParcel,
    ) -> Result<Parcel, sqlx::Error> {
        let query = format!(
            "INSERT INTO parcels \
                (id, parcel_code, locker_id, compartment_id, size, sender_phone, receiver_phone, \
                 pickup_code, status_id, reserved_at, deposited_at, picked_up_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        let lifecycle = &input.lifecycle;
        sqlx::query_as::<_, Parcel>(&query)
            .bind(input.id)
            .bind(&input.parcel_code)
            .bind(input.locker_id)
            .bind(lifecycle.compartment_id)
            .bind(input.size.as_str())
            .bind(&input.sender_phone)
            .bind(&input.receiver_phone)
            .bind(&input.pickup_code)
            .bind(lifecycle.status.id())
            .bind(lifecycle.reserved_at)
            .bind(lifecycle.deposited_at)
            .bind(lifecycle.picked_up_at)
            .bind(lifecycle.expires_at)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Parcel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parcels WHERE id = $1");
        sqlx::query_as::<_, Parcel>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Parcel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parcels WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Parcel>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Persist the lifecycle fields of a validated transition.
    pub async fn update_lifecycle(
        conn: &mut PgConnection,
        id: DbId,
        lifecycle: &ParcelLifecycle,
    ) -> Result<Parcel, sqlx::Error> {
        let query = format!(
            "UPDATE parcels SET \
                 status_id = $2, compartment_id = $3, reserved_at = $4, \
                 deposited_at = $5, picked_up_at = $6, expires_at = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Parcel>(&query)
            .bind(id)
            .bind(lifecycle.status.id())
            .bind(lifecycle.compartment_id)
            .bind(lifecycle.reserved_at)
            .bind(lifecycle.deposited_at)
            .bind(lifecycle.picked_up_at)
            .bind(lifecycle.expires_at)
            .fetch_one(conn)
            .await
    }

    /// `PICKUP_READY` parcels where `phone` is receiver or sender, oldest first.
    pub async fn list_ready_by_phone<'e, E: PgExecutor<'e>>(
        executor: E,
        phone: &str,
    ) -> Result<Vec<Parcel>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parcels \
             WHERE status_id = $1 AND (receiver_phone = $2 OR sender_phone = $2) \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Parcel>(&query)
            .bind(ParcelStatus::PickupReady.id())
            .bind(phone)
            .fetch_all(executor)
            .await
    }

    /// IDs of `PICKUP_READY` parcels whose deadline is at or before `now`,
    /// oldest deadline first, leaving out `exclude`.
    pub async fn list_due_for_expiry<'e, E: PgExecutor<'e>>(
        executor: E,
        now: Timestamp,
        exclude: &[DbId],
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM parcels \
             WHERE status_id = $1 AND expires_at IS NOT NULL AND expires_at <= $2 \
               AND id <> ALL($3) \
             ORDER BY expires_at ASC, id \
             LIMIT $4",
        )
        .bind(ParcelStatus::PickupReady.id())
        .bind(now)
        .bind(exclude)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    pub async fn count_by_status<'e, E: PgExecutor<'e>>(
        executor: E,
        statuses: &[ParcelStatus],
    ) -> Result<i64, sqlx::Error> {
        let ids: Vec<StatusId> = statuses.iter().map(|s| s.id()).collect();
        sqlx::query_scalar("SELECT COUNT(*) FROM parcels WHERE status_id = ANY($1)")
            .bind(ids)
            .fetch_one(executor)
            .await
    }
}
