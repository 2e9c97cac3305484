use locker_core::compartment::{CompartmentSize, Occupancy};
use locker_core::status::CompartmentStatus;
use locker_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `compartments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Compartment {
    pub id: DbId,
    pub locker_id: DbId,
    pub compartment_no: i32,
    #[sqlx(try_from = "String")]
    pub size: CompartmentSize,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: CompartmentStatus,
    pub overdue_fee_per_day: i64,
    pub parcel_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Compartment {
    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            status: self.status,
            parcel_id: self.parcel_id,
        }
    }
}

/// One compartment in a bulk create request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompartment {
    pub compartment_no: i32,
    pub size: CompartmentSize,
    #[serde(default)]
    pub overdue_fee_per_day: i64,
}
