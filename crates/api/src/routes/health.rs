use axum::extract::State;
use axum::{routing::get, Json, Router};
use locker_core::status::{LockerStatus, ParcelStatus};
use locker_db::repositories::{LockerRepo, ParcelRepo};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Lockers currently accepting deposits. Absent when the database is down.
    pub lockers_active: Option<i64>,
    /// Parcels sitting in a compartment waiting for their receiver.
    pub parcels_awaiting_pickup: Option<i64>,
}

/// GET /health -- database reachability plus a snapshot of locker capacity.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = locker_db::health_check(&state.pool).await.is_ok();

    let (lockers_active, parcels_awaiting_pickup) = if db_healthy {
        (
            LockerRepo::count_by_status(&state.pool, &[LockerStatus::Active])
                .await
                .ok(),
            ParcelRepo::count_by_status(&state.pool, &[ParcelStatus::PickupReady])
                .await
                .ok(),
        )
    } else {
        (None, None)
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        lockers_active,
        parcels_awaiting_pickup,
    })
}

/// Mount health check routes (root-level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
