//! Periodic expiry of parcels left past their pickup deadline.
//!
//! Runs [`services::expiry::run_expire`] on a fixed interval using
//! `tokio::time::interval`. The same sweep is exposed for manual runs at
//! `POST /admin/parcels/expire`.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::services;

/// Run the expiry sweep loop until `cancel` is triggered.
///
/// A sweep in progress stops between parcels once cancelled.
pub async fn run(pool: PgPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Parcel expiry job started");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Parcel expiry job stopping");
                break;
            }
            _ = interval.tick() => {
                match services::expiry::run_expire(&pool, Utc::now(), &cancel).await {
                    Ok(summary) if summary.expired > 0 => {
                        tracing::info!(expired = summary.expired, "Parcel expiry: parcels expired");
                    }
                    Ok(_) => tracing::debug!("Parcel expiry: nothing due"),
                    Err(e) => tracing::error!(error = %e, "Parcel expiry: sweep failed"),
                }
            }
        }
    }
}
