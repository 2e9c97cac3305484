//! Inventory provisioning and the read models built on it.

use std::collections::HashSet;

use locker_core::error::CoreError;
use locker_core::status::{CompartmentStatus, LockerStatus, ParcelStatus};
use locker_core::types::DbId;
use locker_db::models::compartment::{Compartment, CreateCompartment};
use locker_db::models::location::{CreateLocation, Location};
use locker_db::models::locker::{AvailableLocker, CreateLocker, Locker};
use locker_db::repositories::{CompartmentRepo, LocationRepo, LockerRepo, ParcelRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Parcel statuses counted as active in the overview.
const ACTIVE_PARCEL_STATUSES: [ParcelStatus; 4] = [
    ParcelStatus::Created,
    ParcelStatus::Reserved,
    ParcelStatus::Stored,
    ParcelStatus::PickupReady,
];

/// Counts shown on the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub locations: i64,
    pub lockers: i64,
    pub lockers_active: i64,
    pub compartments: i64,
    pub compartments_available: i64,
    pub parcels_active: i64,
    pub parcels_expired: i64,
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

pub async fn create_location(pool: &PgPool, input: &CreateLocation) -> AppResult<Location> {
    require("code", &input.code)?;
    require("name", &input.name)?;

    let location = LocationRepo::create(pool, input).await?;
    tracing::info!(location_id = %location.id, code = %location.code, "Location created");
    Ok(location)
}

// ---------------------------------------------------------------------------
// Lockers
// ---------------------------------------------------------------------------

pub async fn create_locker(pool: &PgPool, input: &CreateLocker) -> AppResult<Locker> {
    require("locker_code", &input.locker_code)?;
    LocationRepo::find_by_id(pool, input.location_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Location",
            id: input.location_id,
        })?;

    let locker = LockerRepo::create(pool, input).await?;
    tracing::info!(
        locker_id = %locker.id,
        location_id = %locker.location_id,
        code = %locker.locker_code,
        "Locker created",
    );
    Ok(locker)
}

pub async fn update_locker_status(
    pool: &PgPool,
    id: DbId,
    status: LockerStatus,
) -> AppResult<Locker> {
    let locker = LockerRepo::update_status(pool, id, status)
        .await?
        .ok_or(CoreError::locker_not_found(id))?;
    tracing::info!(locker_id = %id, status = %status, "Locker status updated");
    Ok(locker)
}

/// `ACTIVE` lockers with their location names, for courier selection.
pub async fn available_lockers(pool: &PgPool) -> AppResult<Vec<AvailableLocker>> {
    Ok(LockerRepo::list_available(pool).await?)
}

// ---------------------------------------------------------------------------
// Compartments
// ---------------------------------------------------------------------------

/// Create a batch of compartments for one locker, all or nothing.
pub async fn create_compartments(
    pool: &PgPool,
    locker_id: DbId,
    inputs: &[CreateCompartment],
) -> AppResult<Vec<Compartment>> {
    if inputs.is_empty() {
        return Err(CoreError::Validation("compartments must not be empty".into()).into());
    }
    let mut seen = HashSet::new();
    for input in inputs {
        if input.compartment_no <= 0 {
            return Err(CoreError::Validation("compartment_no must be positive".into()).into());
        }
        if input.overdue_fee_per_day < 0 {
            return Err(
                CoreError::Validation("overdue_fee_per_day must not be negative".into()).into(),
            );
        }
        if !seen.insert(input.compartment_no) {
            return Err(CoreError::Validation(format!(
                "duplicate compartment_no {}",
                input.compartment_no
            ))
            .into());
        }
    }

    let mut tx = pool.begin().await?;
    LockerRepo::find_by_id(&mut *tx, locker_id)
        .await?
        .ok_or(CoreError::locker_not_found(locker_id))?;
    let created = CompartmentRepo::create_bulk(&mut tx, locker_id, inputs).await?;
    tx.commit().await?;

    tracing::info!(locker_id = %locker_id, count = created.len(), "Compartments created");
    Ok(created)
}

pub async fn list_compartments(pool: &PgPool, locker_id: DbId) -> AppResult<Vec<Compartment>> {
    LockerRepo::find_by_id(pool, locker_id)
        .await?
        .ok_or(CoreError::locker_not_found(locker_id))?;
    Ok(CompartmentRepo::list_by_locker(pool, locker_id).await?)
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

pub async fn overview(pool: &PgPool) -> AppResult<Overview> {
    Ok(Overview {
        locations: LocationRepo::count(pool).await?,
        lockers: LockerRepo::count(pool).await?,
        lockers_active: LockerRepo::count_by_status(pool, &[LockerStatus::Active]).await?,
        compartments: CompartmentRepo::count(pool).await?,
        compartments_available: CompartmentRepo::count_by_status(
            pool,
            &[CompartmentStatus::Available],
        )
        .await?,
        parcels_active: ParcelRepo::count_by_status(pool, &ACTIVE_PARCEL_STATUSES).await?,
        parcels_expired: ParcelRepo::count_by_status(pool, &[ParcelStatus::Expired]).await?,
    })
}
