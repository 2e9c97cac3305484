//! Parcel lifecycle state machine.
//!
//! ```text
//! CREATED -> RESERVED -> STORED -> PICKUP_READY -> PICKED_UP
//!     \          \          \            |\
//!      +----------+----------+-----------+ +--> EXPIRED
//!                 |
//!                 v
//!             CANCELLED
//! ```
//!
//! Transitions are pure: each returns a new [`ParcelLifecycle`] or an
//! `InvalidStatusTransition` error, leaving the input untouched. Persisting
//! the result and appending the matching event is the caller's job.

use chrono::Duration;

use crate::error::CoreError;
use crate::status::ParcelStatus;
use crate::types::{DbId, Timestamp};

/// Mutable lifecycle fields of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParcelLifecycle {
    pub status: ParcelStatus,
    pub compartment_id: Option<DbId>,
    pub reserved_at: Option<Timestamp>,
    pub deposited_at: Option<Timestamp>,
    pub picked_up_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl ParcelLifecycle {
    /// A freshly created parcel with no compartment.
    pub fn new() -> Self {
        Self {
            status: ParcelStatus::Created,
            compartment_id: None,
            reserved_at: None,
            deposited_at: None,
            picked_up_at: None,
            expires_at: None,
        }
    }

    /// One-shot deposit: the parcel goes straight into an occupied compartment
    /// and becomes ready for pickup until `now + pickup_window`.
    pub fn deposited(compartment_id: DbId, now: Timestamp, pickup_window: Duration) -> Self {
        Self {
            status: ParcelStatus::PickupReady,
            compartment_id: Some(compartment_id),
            reserved_at: Some(now),
            deposited_at: Some(now),
            picked_up_at: None,
            expires_at: Some(now + pickup_window),
        }
    }

    fn expect(&self, allowed: &[ParcelStatus], to: ParcelStatus) -> Result<(), CoreError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: self.status,
                to,
            })
        }
    }

    /// CREATED -> RESERVED.
    pub fn reserve(&self, compartment_id: DbId, now: Timestamp) -> Result<Self, CoreError> {
        self.expect(&[ParcelStatus::Created], ParcelStatus::Reserved)?;
        Ok(Self {
            status: ParcelStatus::Reserved,
            compartment_id: Some(compartment_id),
            reserved_at: Some(now),
            ..*self
        })
    }

    /// RESERVED -> STORED.
    pub fn store(&self, now: Timestamp) -> Result<Self, CoreError> {
        self.expect(&[ParcelStatus::Reserved], ParcelStatus::Stored)?;
        Ok(Self {
            status: ParcelStatus::Stored,
            deposited_at: Some(now),
            ..*self
        })
    }

    /// STORED -> PICKUP_READY, optionally overriding the expiry deadline.
    pub fn ready(&self, expires_at: Option<Timestamp>) -> Result<Self, CoreError> {
        self.expect(&[ParcelStatus::Stored], ParcelStatus::PickupReady)?;
        Ok(Self {
            status: ParcelStatus::PickupReady,
            expires_at: expires_at.or(self.expires_at),
            ..*self
        })
    }

    /// PICKUP_READY -> PICKED_UP.
    pub fn pickup(&self, now: Timestamp) -> Result<Self, CoreError> {
        self.expect(&[ParcelStatus::PickupReady], ParcelStatus::PickedUp)?;
        Ok(Self {
            status: ParcelStatus::PickedUp,
            picked_up_at: Some(now),
            ..*self
        })
    }

    /// PICKUP_READY -> EXPIRED.
    pub fn expire(&self, now: Timestamp) -> Result<Self, CoreError> {
        self.expect(&[ParcelStatus::PickupReady], ParcelStatus::Expired)?;
        Ok(Self {
            status: ParcelStatus::Expired,
            expires_at: self.expires_at.or(Some(now)),
            ..*self
        })
    }

    /// Any non-terminal state -> CANCELLED.
    pub fn cancel(&self) -> Result<Self, CoreError> {
        self.expect(
            &[
                ParcelStatus::Created,
                ParcelStatus::Reserved,
                ParcelStatus::Stored,
                ParcelStatus::PickupReady,
            ],
            ParcelStatus::Cancelled,
        )?;
        Ok(Self {
            status: ParcelStatus::Cancelled,
            ..*self
        })
    }

    /// `true` once the pickup deadline has passed.
    pub fn is_past_expiry(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl Default for ParcelLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
