//! Repository for the append-only `parcel_events` table.

use locker_core::status::ParcelStatus;
use locker_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::parcel_event::ParcelEvent;

const COLUMNS: &str = "id, parcel_id, event_type, created_at";

/// Appends and reads parcel events. There is no update or delete.
pub struct ParcelEventRepo;

impl ParcelEventRepo {
    /// Record that `parcel_id` entered `status`.
    pub async fn append<'e, E: PgExecutor<'e>>(
        executor: E,
        parcel_id: DbId,
        status: ParcelStatus,
    ) -> Result<ParcelEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO parcel_events (parcel_id, event_type) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParcelEvent>(&query)
            .bind(parcel_id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// Timeline for one parcel, oldest first.
    pub async fn list_by_parcel<'e, E: PgExecutor<'e>>(
        executor: E,
        parcel_id: DbId,
    ) -> Result<Vec<ParcelEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM parcel_events WHERE parcel_id = $1 ORDER BY created_at ASC, id"
        );
        sqlx::query_as::<_, ParcelEvent>(&query)
            .bind(parcel_id)
            .fetch_all(executor)
            .await
    }
}
