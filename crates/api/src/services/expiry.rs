//! Expiry sweep for parcels left past their pickup deadline.

use locker_core::status::ParcelStatus;
use locker_core::types::{DbId, Timestamp};
use locker_db::repositories::{OtpRepo, ParcelEventRepo, ParcelRepo};
use serde::Serialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::services::compartments;

/// Parcels fetched per page of a sweep.
pub const SWEEP_PAGE_SIZE: i64 = 500;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpirySummary {
    pub scanned: usize,
    pub expired: usize,
    pub failed: usize,
}

/// Expire every PICKUP_READY parcel whose deadline is at or before `now`.
///
/// Each parcel gets its own transaction, so one failure is logged and
/// counted without stopping the rest. `cancel` is checked between parcels.
pub async fn run_expire(
    pool: &PgPool,
    now: Timestamp,
    cancel: &CancellationToken,
) -> AppResult<ExpirySummary> {
    run_expire_paged(pool, now, cancel, SWEEP_PAGE_SIZE).await
}

/// [`run_expire`] with an explicit page size.
///
/// Pages are fetched until one comes back empty. Expired parcels drop out of
/// the due set on their own; failed or skipped ones are excluded from later
/// pages so they cannot stall the sweep.
pub async fn run_expire_paged(
    pool: &PgPool,
    now: Timestamp,
    cancel: &CancellationToken,
    page_size: i64,
) -> AppResult<ExpirySummary> {
    let mut summary = ExpirySummary::default();
    let mut passed_over: Vec<DbId> = Vec::new();

    'sweep: loop {
        let page = ParcelRepo::list_due_for_expiry(pool, now, &passed_over, page_size).await?;
        if page.is_empty() {
            break;
        }

        for parcel_id in page {
            if cancel.is_cancelled() {
                tracing::info!(
                    scanned = summary.scanned,
                    expired = summary.expired,
                    "Expiry sweep interrupted",
                );
                break 'sweep;
            }

            summary.scanned += 1;
            match expire_one(pool, parcel_id, now).await {
                Ok(true) => summary.expired += 1,
                Ok(false) => passed_over.push(parcel_id),
                Err(e) => {
                    summary.failed += 1;
                    passed_over.push(parcel_id);
                    tracing::error!(parcel_id = %parcel_id, error = %e, "Failed to expire parcel");
                }
            }
        }
    }

    if summary.scanned > 0 {
        tracing::info!(
            scanned = summary.scanned,
            expired = summary.expired,
            failed = summary.failed,
            "Expiry sweep finished",
        );
    }
    Ok(summary)
}

/// Expire one parcel. Returns `false` when it no longer qualifies.
async fn expire_one(pool: &PgPool, parcel_id: DbId, now: Timestamp) -> AppResult<bool> {
    let mut tx = pool.begin().await?;
    let Some(parcel) = ParcelRepo::find_by_id_for_update(&mut tx, parcel_id).await? else {
        return Ok(false);
    };

    // Picked up or cancelled since the scan.
    if parcel.status != ParcelStatus::PickupReady || !parcel.lifecycle().is_past_expiry(now) {
        return Ok(false);
    }

    let lifecycle = parcel.lifecycle().expire(now)?;
    if let Some(compartment_id) = parcel.compartment_id {
        compartments::release_for_parcel(&mut tx, compartment_id, parcel.id).await?;
    }
    let otps = OtpRepo::expire_active_by_parcel(&mut tx, parcel.id).await?;
    let updated = ParcelRepo::update_lifecycle(&mut tx, parcel.id, &lifecycle).await?;
    ParcelEventRepo::append(&mut *tx, parcel.id, updated.status).await?;
    tx.commit().await?;

    tracing::debug!(parcel_id = %parcel_id, otps_expired = otps, "Parcel expired");
    Ok(true)
}
