//! Repository for the `lockers` table.

use locker_core::status::{LockerStatus, StatusId};
use locker_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::locker::{AvailableLocker, CreateLocker, Locker};

const COLUMNS: &str = "id, location_id, locker_code, name, status_id, created_at, updated_at";

/// Provides CRUD operations for lockers.
pub struct LockerRepo;

impl LockerRepo {
    /// Insert a locker. Missing status defaults to `ACTIVE`.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &CreateLocker,
    ) -> Result<Locker, sqlx::Error> {
        let query = format!(
            "INSERT INTO lockers (location_id, locker_code, name, status_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(input.location_id)
            .bind(&input.locker_code)
            .bind(&input.name)
            .bind(input.status.unwrap_or(LockerStatus::Active).id())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE id = $1");
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Share-lock the locker row for the rest of the transaction.
    ///
    /// Concurrent deposits share the lock and never wait on each other; a
    /// status change waits until they commit, so the `ACTIVE` check holds.
    pub async fn find_by_id_for_share(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lockers WHERE id = $1 FOR SHARE");
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Returns `None` when no locker has this id.
    pub async fn update_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
        status: LockerStatus,
    ) -> Result<Option<Locker>, sqlx::Error> {
        let query = format!(
            "UPDATE lockers SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Locker>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_optional(executor)
            .await
    }

    /// `ACTIVE` lockers with their location name, ordered by locker code.
    pub async fn list_available<'e, E: PgExecutor<'e>>(
        executor: E,
    ) -> Result<Vec<AvailableLocker>, sqlx::Error> {
        sqlx::query_as::<_, AvailableLocker>(
            "SELECT l.id, l.locker_code, l.name, l.location_id, loc.name AS location_name \
             FROM lockers l \
             JOIN locations loc ON loc.id = l.location_id \
             WHERE l.status_id = $1 \
             ORDER BY l.locker_code",
        )
        .bind(LockerStatus::Active.id())
        .fetch_all(executor)
        .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lockers")
            .fetch_one(executor)
            .await
    }

    pub async fn count_by_status<'e, E: PgExecutor<'e>>(
        executor: E,
        statuses: &[LockerStatus],
    ) -> Result<i64, sqlx::Error> {
        let ids: Vec<StatusId> = statuses.iter().map(|s| s.id()).collect();
        sqlx::query_scalar("SELECT COUNT(*) FROM lockers WHERE status_id = ANY($1)")
            .bind(ids)
            .fetch_one(executor)
            .await
    }
}
