use locker_core::status::LockerStatus;
use locker_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lockers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Locker {
    pub id: DbId,
    pub location_id: DbId,
    pub locker_code: String,
    pub name: Option<String>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: LockerStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /api/v1/admin/lockers`. Status defaults to `ACTIVE`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocker {
    pub location_id: DbId,
    pub locker_code: String,
    pub name: Option<String>,
    pub status: Option<LockerStatus>,
}

/// DTO for `PATCH /api/v1/admin/lockers/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLockerStatus {
    pub status: LockerStatus,
}

/// An `ACTIVE` locker joined with its location name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailableLocker {
    pub id: DbId,
    pub locker_code: String,
    pub name: Option<String>,
    pub location_id: DbId,
    pub location_name: String,
}
