//! Token-gated parcel listing and pickup confirmation.

use locker_core::compartment::CompartmentSize;
use locker_core::error::CoreError;
use locker_core::overdue::calculate_overdue;
use locker_core::phone::mask_phone;
use locker_core::pickup_token::{validate_token, PickupTokenStore};
use locker_core::status::ParcelStatus;
use locker_core::types::{DbId, Timestamp};
use locker_db::models::parcel::Parcel;
use locker_db::repositories::{OtpRepo, ParcelEventRepo, ParcelRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::compartments;

/// A parcel waiting for the token holder.
#[derive(Debug, Clone, Serialize)]
pub struct PickupParcel {
    pub parcel_id: DbId,
    pub parcel_code: String,
    pub locker_id: DbId,
    pub compartment_id: Option<DbId>,
    pub size: CompartmentSize,
    pub deposited_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

impl From<Parcel> for PickupParcel {
    fn from(parcel: Parcel) -> Self {
        Self {
            parcel_id: parcel.id,
            parcel_code: parcel.parcel_code,
            locker_id: parcel.locker_id,
            compartment_id: parcel.compartment_id,
            size: parcel.size,
            deposited_at: parcel.deposited_at,
            expires_at: parcel.expires_at,
        }
    }
}

/// Outcome of a confirmed pickup.
#[derive(Debug, Clone, Serialize)]
pub struct PickupConfirmed {
    pub parcel_id: DbId,
    pub status: ParcelStatus,
    pub picked_up_at: Option<Timestamp>,
    pub overdue_days: i64,
    pub overdue_fee: i64,
}

/// List PICKUP_READY parcels addressed to or sent by the token holder.
pub async fn list_parcels(
    pool: &PgPool,
    tokens: &dyn PickupTokenStore,
    token: &str,
    now: Timestamp,
) -> AppResult<Vec<PickupParcel>> {
    let session = validate_token(tokens, token, now)?;
    let parcels = ParcelRepo::list_ready_by_phone(pool, &session.phone).await?;

    tracing::debug!(
        phone = %mask_phone(&session.phone),
        count = parcels.len(),
        "Pickup parcels listed",
    );
    Ok(parcels.into_iter().map(PickupParcel::from).collect())
}

/// Hand a parcel over to the token holder.
///
/// The parcel must be PICKUP_READY and belong to the holder's phone. The
/// compartment is released, bound OTPs are expired, and the overdue fee is
/// computed from the compartment's daily rate.
pub async fn confirm(
    pool: &PgPool,
    tokens: &dyn PickupTokenStore,
    token: &str,
    parcel_id: DbId,
    now: Timestamp,
) -> AppResult<PickupConfirmed> {
    let session = validate_token(tokens, token, now)?;

    let mut tx = pool.begin().await?;
    let parcel = ParcelRepo::find_by_id_for_update(&mut tx, parcel_id)
        .await?
        .ok_or(CoreError::parcel_not_found(parcel_id))?;

    if parcel.status != ParcelStatus::PickupReady {
        return Err(CoreError::Conflict(format!(
            "parcel is {} and cannot be picked up",
            parcel.status
        ))
        .into());
    }
    if !parcel.belongs_to(&session.phone) {
        tracing::warn!(
            parcel_id = %parcel_id,
            phone = %mask_phone(&session.phone),
            "Pickup attempted for another phone's parcel",
        );
        return Err(CoreError::Forbidden("parcel does not belong to this phone".into()).into());
    }

    let lifecycle = parcel.lifecycle().pickup(now)?;

    let fee_per_day = match parcel.compartment_id {
        Some(compartment_id) => {
            compartments::release(&mut tx, compartment_id, parcel.id)
                .await?
                .overdue_fee_per_day
        }
        None => 0,
    };
    let overdue = calculate_overdue(parcel.deposited_at, now, fee_per_day);

    OtpRepo::expire_active_by_parcel(&mut tx, parcel.id).await?;
    let updated = ParcelRepo::update_lifecycle(&mut tx, parcel.id, &lifecycle).await?;
    ParcelEventRepo::append(&mut *tx, parcel.id, updated.status).await?;
    tx.commit().await?;

    tracing::info!(
        parcel_id = %updated.id,
        phone = %mask_phone(&session.phone),
        overdue_days = overdue.days,
        overdue_fee = overdue.fee,
        "Parcel picked up",
    );

    Ok(PickupConfirmed {
        parcel_id: updated.id,
        status: updated.status,
        picked_up_at: updated.picked_up_at,
        overdue_days: overdue.days,
        overdue_fee: overdue.fee,
    })
}
