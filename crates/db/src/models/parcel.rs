//! Parcel rows and the insert DTO shared by both deposit modes.

use locker_core::compartment::CompartmentSize;
use locker_core::parcel::ParcelLifecycle;
use locker_core::status::ParcelStatus;
use locker_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parcels` table.
///
/// `pickup_code` is never serialized; it is returned once, in the deposit
/// or create response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Parcel {
    pub id: DbId,
    pub parcel_code: String,
    pub locker_id: DbId,
    pub compartment_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub size: CompartmentSize,
    pub sender_phone: String,
    pub receiver_phone: String,
    #[serde(skip_serializing)]
    pub pickup_code: Option<String>,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ParcelStatus,
    pub reserved_at: Option<Timestamp>,
    pub deposited_at: Option<Timestamp>,
    pub picked_up_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Parcel {
    /// The mutable lifecycle fields, for feeding the state machine.
    pub fn lifecycle(&self) -> ParcelLifecycle {
        ParcelLifecycle {
            status: self.status,
            compartment_id: self.compartment_id,
            reserved_at: self.reserved_at,
            deposited_at: self.deposited_at,
            picked_up_at: self.picked_up_at,
            expires_at: self.expires_at,
        }
    }

    /// `true` when `phone` is the receiver or the sender.
    pub fn belongs_to(&self, phone: &str) -> bool {
        self.receiver_phone == phone || self.sender_phone == phone
    }
}

/// Request body shared by `POST /parcels` and `POST /parcels/deposit`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateParcel {
    pub locker_id: DbId,
    pub size: CompartmentSize,
    pub sender_phone: String,
    pub receiver_phone: String,
}

/// Fully-formed parcel ready for insertion.
#[derive(Debug, Clone)]
pub struct NewParcel {
    pub id: DbId,
    pub parcel_code: String,
    pub locker_id: DbId,
    pub size: CompartmentSize,
    pub sender_phone: String,
    pub receiver_phone: String,
    pub pickup_code: Option<String>,
    pub lifecycle: ParcelLifecycle,
}
