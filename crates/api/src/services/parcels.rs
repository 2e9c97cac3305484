//! Parcel deposit and lifecycle transitions.
//!
//! [`deposit`] is the one-shot courier flow. [`create`], [`reserve`],
//! [`store`], [`ready`] and [`cancel`] expose the same lifecycle step by
//! step for reserve-ahead integrations.

use chrono::Duration;
use locker_core::codes::{generate_parcel_code, generate_pickup_code};
use locker_core::compartment::CompartmentSize;
use locker_core::error::CoreError;
use locker_core::parcel::ParcelLifecycle;
use locker_core::phone::{mask_phone, validate_phone};
use locker_core::status::{LockerStatus, ParcelStatus};
use locker_core::types::{DbId, Timestamp};
use locker_db::models::locker::Locker;
use locker_db::models::parcel::{CreateParcel, NewParcel, Parcel};
use locker_db::models::parcel_event::ParcelEvent;
use locker_db::repositories::{LockerRepo, OtpRepo, ParcelEventRepo, ParcelRepo};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::AppResult;
use crate::services::compartments;

/// Result of a successful one-shot deposit.
#[derive(Debug, Clone, Serialize)]
pub struct Deposit {
    pub parcel_id: DbId,
    pub parcel_code: String,
    pub pickup_code: Option<String>,
    pub status: ParcelStatus,
    pub locker_id: DbId,
    pub compartment_id: DbId,
    pub compartment_no: i32,
    pub compartment_size: CompartmentSize,
    pub deposited_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

/// A newly created parcel with its pickup code.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedParcel {
    #[serde(flatten)]
    pub parcel: Parcel,
    pub pickup_code: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_create(input: &CreateParcel) -> AppResult<()> {
    validate_phone("sender_phone", &input.sender_phone)?;
    validate_phone("receiver_phone", &input.receiver_phone)?;
    Ok(())
}

/// Share-lock the locker and require it to be ACTIVE.
pub async fn share_active_locker(conn: &mut PgConnection, locker_id: DbId) -> AppResult<Locker> {
    let locker = LockerRepo::find_by_id_for_share(conn, locker_id)
        .await?
        .ok_or(CoreError::locker_not_found(locker_id))?;
    if locker.status != LockerStatus::Active {
        return Err(CoreError::LockerInactive.into());
    }
    Ok(locker)
}

async fn lock_parcel(conn: &mut PgConnection, id: DbId) -> AppResult<Parcel> {
    let parcel = ParcelRepo::find_by_id_for_update(conn, id)
        .await?
        .ok_or(CoreError::parcel_not_found(id))?;
    Ok(parcel)
}

fn new_parcel(id: DbId, input: &CreateParcel, lifecycle: ParcelLifecycle) -> NewParcel {
    NewParcel {
        id,
        parcel_code: generate_parcel_code(),
        locker_id: input.locker_id,
        size: input.size,
        sender_phone: input.sender_phone.clone(),
        receiver_phone: input.receiver_phone.clone(),
        pickup_code: Some(generate_pickup_code()),
        lifecycle,
    }
}

/// Persist a transition and append its event on the same connection.
async fn apply(
    conn: &mut PgConnection,
    parcel_id: DbId,
    lifecycle: &ParcelLifecycle,
) -> AppResult<Parcel> {
    let updated = ParcelRepo::update_lifecycle(&mut *conn, parcel_id, lifecycle).await?;
    ParcelEventRepo::append(&mut *conn, parcel_id, updated.status).await?;
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub async fn get(pool: &PgPool, id: DbId) -> AppResult<Parcel> {
    let parcel = ParcelRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::parcel_not_found(id))?;
    Ok(parcel)
}

pub async fn events(pool: &PgPool, id: DbId) -> AppResult<Vec<ParcelEvent>> {
    get(pool, id).await?;
    Ok(ParcelEventRepo::list_by_parcel(pool, id).await?)
}

// ---------------------------------------------------------------------------
// One-shot deposit
// ---------------------------------------------------------------------------

/// Allocate, occupy and register a parcel in a single transaction.
///
/// The parcel is created directly in PICKUP_READY with a fresh pickup code
/// and a deadline of `now + pickup_window`. Any failure rolls everything
/// back, leaving the compartment AVAILABLE.
pub async fn deposit(
    pool: &PgPool,
    input: &CreateParcel,
    now: Timestamp,
    pickup_window: Duration,
) -> AppResult<Deposit> {
    validate_create(input)?;

    let mut tx = pool.begin().await?;

    share_active_locker(&mut tx, input.locker_id).await?;

    let parcel_id = DbId::new_v4();
    let reserved = compartments::allocate(&mut tx, input.locker_id, input.size, parcel_id).await?;
    let occupied = compartments::occupy(&mut tx, &reserved, parcel_id).await?;

    let lifecycle = ParcelLifecycle::deposited(occupied.id, now, pickup_window);
    let parcel = ParcelRepo::create(&mut *tx, &new_parcel(parcel_id, input, lifecycle)).await?;
    ParcelEventRepo::append(&mut *tx, parcel.id, parcel.status).await?;

    tx.commit().await?;

    tracing::info!(
        parcel_id = %parcel.id,
        locker_id = %parcel.locker_id,
        compartment_id = %occupied.id,
        size = %occupied.size,
        receiver = %mask_phone(&parcel.receiver_phone),
        "Parcel deposited",
    );

    Ok(Deposit {
        parcel_id: parcel.id,
        parcel_code: parcel.parcel_code,
        pickup_code: parcel.pickup_code,
        status: parcel.status,
        locker_id: parcel.locker_id,
        compartment_id: occupied.id,
        compartment_no: occupied.compartment_no,
        compartment_size: occupied.size,
        deposited_at: parcel.deposited_at,
        expires_at: parcel.expires_at,
    })
}

// ---------------------------------------------------------------------------
// Step-by-step lifecycle
// ---------------------------------------------------------------------------

/// Register a parcel in CREATED without a compartment.
pub async fn create(pool: &PgPool, input: &CreateParcel) -> AppResult<CreatedParcel> {
    validate_create(input)?;

    let mut tx = pool.begin().await?;
    share_active_locker(&mut tx, input.locker_id).await?;

    let parcel = ParcelRepo::create(
        &mut *tx,
        &new_parcel(DbId::new_v4(), input, ParcelLifecycle::new()),
    )
    .await?;
    ParcelEventRepo::append(&mut *tx, parcel.id, parcel.status).await?;
    tx.commit().await?;

    tracing::info!(parcel_id = %parcel.id, locker_id = %parcel.locker_id, "Parcel created");

    let pickup_code = parcel.pickup_code.clone();
    Ok(CreatedParcel {
        parcel,
        pickup_code,
    })
}

/// CREATED -> RESERVED: allocate a compartment for the parcel.
pub async fn reserve(pool: &PgPool, id: DbId, now: Timestamp) -> AppResult<Parcel> {
    let mut tx = pool.begin().await?;
    let parcel = lock_parcel(&mut tx, id).await?;

    // Check the transition before touching any compartment.
    parcel.lifecycle().reserve(DbId::nil(), now)?;

    share_active_locker(&mut tx, parcel.locker_id).await?;
    let compartment = compartments::allocate(&mut tx, parcel.locker_id, parcel.size, parcel.id).await?;
    let lifecycle = parcel.lifecycle().reserve(compartment.id, now)?;
    let updated = apply(&mut tx, parcel.id, &lifecycle).await?;
    tx.commit().await?;

    tracing::info!(
        parcel_id = %updated.id,
        compartment_id = %compartment.id,
        "Parcel reserved",
    );
    Ok(updated)
}

/// RESERVED -> STORED: the courier has placed the parcel.
pub async fn store(pool: &PgPool, id: DbId, now: Timestamp) -> AppResult<Parcel> {
    let mut tx = pool.begin().await?;
    let parcel = lock_parcel(&mut tx, id).await?;
    let lifecycle = parcel.lifecycle().store(now)?;

    let compartment_id = lifecycle
        .compartment_id
        .ok_or_else(|| CoreError::Internal(format!("reserved parcel {id} has no compartment")))?;
    let compartment = compartments::lock(&mut tx, compartment_id).await?;
    compartments::occupy(&mut tx, &compartment, parcel.id).await?;

    let updated = apply(&mut tx, parcel.id, &lifecycle).await?;
    tx.commit().await?;

    tracing::info!(parcel_id = %updated.id, compartment_id = %compartment_id, "Parcel stored");
    Ok(updated)
}

/// STORED -> PICKUP_READY.
///
/// `expires_at` overrides the deadline; otherwise an existing deadline is
/// kept, falling back to `now + pickup_window`.
pub async fn ready(
    pool: &PgPool,
    id: DbId,
    expires_at: Option<Timestamp>,
    now: Timestamp,
    pickup_window: Duration,
) -> AppResult<Parcel> {
    if let Some(at) = expires_at {
        if at <= now {
            return Err(CoreError::Validation("expires_at must be in the future".into()).into());
        }
    }

    let mut tx = pool.begin().await?;
    let parcel = lock_parcel(&mut tx, id).await?;
    let deadline = expires_at
        .or(parcel.expires_at)
        .unwrap_or(now + pickup_window);
    let lifecycle = parcel.lifecycle().ready(Some(deadline))?;
    let updated = apply(&mut tx, parcel.id, &lifecycle).await?;
    tx.commit().await?;

    tracing::info!(parcel_id = %updated.id, expires_at = %deadline, "Parcel ready for pickup");
    Ok(updated)
}

/// Any non-terminal state -> CANCELLED, releasing the compartment if held.
pub async fn cancel(pool: &PgPool, id: DbId) -> AppResult<Parcel> {
    let mut tx = pool.begin().await?;
    let parcel = lock_parcel(&mut tx, id).await?;
    let lifecycle = parcel.lifecycle().cancel()?;

    if let Some(compartment_id) = parcel.compartment_id {
        compartments::release_for_parcel(&mut tx, compartment_id, parcel.id).await?;
    }
    OtpRepo::expire_active_by_parcel(&mut tx, parcel.id).await?;

    let updated = apply(&mut tx, parcel.id, &lifecycle).await?;
    tx.commit().await?;

    tracing::info!(parcel_id = %updated.id, "Parcel cancelled");
    Ok(updated)
}
