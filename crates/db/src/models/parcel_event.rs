use locker_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `parcel_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParcelEvent {
    pub id: DbId,
    pub parcel_id: DbId,
    pub event_type: String,
    pub created_at: Timestamp,
}
