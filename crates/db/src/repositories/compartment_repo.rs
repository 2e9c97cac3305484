//! Repository for the `compartments` table.
//!
//! Status and `parcel_id` are always written together through
//! [`CompartmentRepo::set_occupancy`].

use locker_core::compartment::{CompartmentSize, Occupancy};
use locker_core::status::{CompartmentStatus, StatusId};
use locker_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::compartment::{Compartment, CreateCompartment};

const COLUMNS: &str = "\
    id, locker_id, compartment_no, size, status_id, overdue_fee_per_day, \
    parcel_id, created_at, updated_at";

/// Provides allocation, occupancy and provisioning operations for compartments.
pub struct CompartmentRepo;

impl CompartmentRepo {
    /// Insert a batch of compartments for one locker, all `AVAILABLE`.
    ///
    /// A duplicate `compartment_no` fails the whole batch when the caller
    /// runs this inside a transaction.
    pub async fn create_bulk(
        conn: &mut PgConnection,
        locker_id: DbId,
        inputs: &[CreateCompartment],
    ) -> Result<Vec<Compartment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO compartments (locker_id, compartment_no, size, status_id, overdue_fee_per_day) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let row = sqlx::query_as::<_, Compartment>(&query)
                .bind(locker_id)
                .bind(input.compartment_no)
                .bind(input.size.as_str())
                .bind(CompartmentStatus::Available.id())
                .bind(input.overdue_fee_per_day)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Compartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM compartments WHERE id = $1");
        sqlx::query_as::<_, Compartment>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Compartment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM compartments WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Compartment>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a locker's compartments by number.
    pub async fn list_by_locker<'e, E: PgExecutor<'e>>(
        executor: E,
        locker_id: DbId,
    ) -> Result<Vec<Compartment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM compartments WHERE locker_id = $1 ORDER BY compartment_no"
        );
        sqlx::query_as::<_, Compartment>(&query)
            .bind(locker_id)
            .fetch_all(executor)
            .await
    }

    /// Lock the best-fitting `AVAILABLE` compartment among `sizes`.
    ///
    /// Smaller sizes win, then the lowest compartment number. Rows locked by
    /// another transaction are skipped rather than waited on, so `None`
    /// means nothing is free right now.
    pub async fn find_available_by_locker_sizes_for_update(
        conn: &mut PgConnection,
        locker_id: DbId,
        sizes: &[CompartmentSize],
    ) -> Result<Option<Compartment>, sqlx::Error> {
        let size_labels: Vec<&str> = sizes.iter().map(|s| s.as_str()).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM compartments \
             WHERE locker_id = $1 AND status_id = $2 AND size = ANY($3) \
             ORDER BY CASE size WHEN 'S' THEN 1 WHEN 'M' THEN 2 WHEN 'L' THEN 3 END, \
                      compartment_no ASC \
             LIMIT 1 \
             FOR UPDATE SKIP LOCKED"
        );
        sqlx::query_as::<_, Compartment>(&query)
            .bind(locker_id)
            .bind(CompartmentStatus::Available.id())
            .bind(size_labels)
            .fetch_optional(conn)
            .await
    }

    /// Write status and parcel reference in one statement.
    pub async fn set_occupancy(
        conn: &mut PgConnection,
        id: DbId,
        occupancy: Occupancy,
    ) -> Result<Compartment, sqlx::Error> {
        let query = format!(
            "UPDATE compartments SET status_id = $2, parcel_id = $3 WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Compartment>(&query)
            .bind(id)
            .bind(occupancy.status.id())
            .bind(occupancy.parcel_id)
            .fetch_one(conn)
            .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM compartments")
            .fetch_one(executor)
            .await
    }

    pub async fn count_by_status<'e, E: PgExecutor<'e>>(
        executor: E,
        statuses: &[CompartmentStatus],
    ) -> Result<i64, sqlx::Error> {
        let ids: Vec<StatusId> = statuses.iter().map(|s| s.id()).collect();
        sqlx::query_scalar("SELECT COUNT(*) FROM compartments WHERE status_id = ANY($1)")
            .bind(ids)
            .fetch_one(executor)
            .await
    }
}
