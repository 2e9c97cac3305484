//! Compartment allocation and release inside an open transaction.

use locker_core::compartment::CompartmentSize;
use locker_core::error::CoreError;
use locker_core::types::DbId;
use locker_db::models::compartment::Compartment;
use locker_db::repositories::CompartmentRepo;
use sqlx::PgConnection;

use crate::error::AppResult;

/// Reserve the best-fitting free compartment in `locker_id` for `parcel_id`.
///
/// Candidates are `requested` and every larger size. Rows locked by a
/// concurrent allocation are skipped, so contention surfaces immediately as
/// `NoAvailableCompartment` instead of blocking.
pub async fn allocate(
    conn: &mut PgConnection,
    locker_id: DbId,
    requested: CompartmentSize,
    parcel_id: DbId,
) -> AppResult<Compartment> {
    let candidates = requested.best_fit_candidates();
    let compartment =
        CompartmentRepo::find_available_by_locker_sizes_for_update(&mut *conn, locker_id, &candidates)
            .await?
            .ok_or(CoreError::NoAvailableCompartment)?;

    tracing::debug!(
        locker_id = %locker_id,
        compartment_id = %compartment.id,
        requested_size = %requested,
        size = %compartment.size,
        "Compartment selected",
    );

    let reserved = compartment.occupancy().reserve(parcel_id)?;
    Ok(CompartmentRepo::set_occupancy(conn, compartment.id, reserved).await?)
}

/// Move a reserved compartment to OCCUPIED.
pub async fn occupy(
    conn: &mut PgConnection,
    compartment: &Compartment,
    parcel_id: DbId,
) -> AppResult<Compartment> {
    let occupied = compartment.occupancy().occupy(parcel_id)?;
    Ok(CompartmentRepo::set_occupancy(conn, compartment.id, occupied).await?)
}

/// Lock a compartment by id, failing with a not-found error when missing.
pub async fn lock(conn: &mut PgConnection, id: DbId) -> AppResult<Compartment> {
    let compartment = CompartmentRepo::find_by_id_for_update(conn, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Compartment",
            id,
        })?;
    Ok(compartment)
}

/// Lock and release the compartment `parcel_id` occupies.
///
/// Fails with `Conflict` when it holds another parcel or none, and with
/// `InvalidCompartmentStatus` unless it is RESERVED or OCCUPIED.
pub async fn release(conn: &mut PgConnection, id: DbId, parcel_id: DbId) -> AppResult<Compartment> {
    let compartment = lock(&mut *conn, id).await?;
    if compartment.parcel_id != Some(parcel_id) {
        tracing::error!(
            compartment_id = %id,
            parcel_id = %parcel_id,
            holder = ?compartment.parcel_id,
            "Compartment is not held by parcel",
        );
        return Err(CoreError::Conflict(format!(
            "compartment {id} is not held by parcel {parcel_id}"
        ))
        .into());
    }
    let released = compartment.occupancy().release()?;
    Ok(CompartmentRepo::set_occupancy(conn, id, released).await?)
}

/// Release the compartment held by `parcel_id`, if it still holds it.
///
/// Used on terminal transitions, where a compartment that was already
/// freed or reassigned must not block the parcel update.
pub async fn release_for_parcel(
    conn: &mut PgConnection,
    compartment_id: DbId,
    parcel_id: DbId,
) -> AppResult<Option<Compartment>> {
    let compartment = lock(&mut *conn, compartment_id).await?;
    if compartment.parcel_id != Some(parcel_id) {
        tracing::warn!(
            compartment_id = %compartment_id,
            parcel_id = %parcel_id,
            status = %compartment.status,
            "Compartment no longer held by parcel, skipping release",
        );
        return Ok(None);
    }
    let released = compartment.occupancy().release()?;
    Ok(Some(
        CompartmentRepo::set_occupancy(conn, compartment_id, released).await?,
    ))
}
