//! Handlers for the `/admin` resource: provisioning, overview and the
//! manual expiry trigger. Every handler requires an `ADMIN` access token.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use locker_db::models::compartment::CreateCompartment;
use locker_db::models::location::CreateLocation;
use locker_db::models::locker::{CreateLocker, UpdateLockerStatus};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::handlers::parse_id;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::{admin, expiry};
use crate::state::AppState;

/// Body for `POST /admin/lockers/{id}/compartments`.
#[derive(Debug, Deserialize)]
pub struct CreateCompartments {
    pub compartments: Vec<CreateCompartment>,
}

// ---------------------------------------------------------------------------
// Locations and lockers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/locations
pub async fn create_location(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    payload: Result<Json<CreateLocation>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let location = admin::create_location(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(location))))
}

/// POST /api/v1/admin/lockers
pub async fn create_locker(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    payload: Result<Json<CreateLocker>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let locker = admin::create_locker(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(locker))))
}

/// PATCH /api/v1/admin/lockers/{id}/status
pub async fn update_locker_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLockerStatus>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let locker = admin::update_locker_status(&state.pool, id, input.status).await?;
    Ok(Json(DataResponse::new(locker)))
}

// ---------------------------------------------------------------------------
// Compartments
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/lockers/{id}/compartments
pub async fn create_compartments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CreateCompartments>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    let created = admin::create_compartments(&state.pool, id, &input.compartments).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/v1/admin/lockers/{id}/compartments
pub async fn list_compartments(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let compartments = admin::list_compartments(&state.pool, parse_id(&id)?).await?;
    Ok(Json(DataResponse::new(compartments)))
}

// ---------------------------------------------------------------------------
// Overview and expiry
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/overview
pub async fn get_overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let overview = admin::overview(&state.pool).await?;
    Ok(Json(DataResponse::new(overview)))
}

/// POST /api/v1/admin/parcels/expire
///
/// Run one expiry sweep now and report its counts.
pub async fn expire_parcels(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let summary = expiry::run_expire(&state.pool, Utc::now(), &CancellationToken::new()).await?;
    tracing::info!(admin_id = %admin.user_id, expired = summary.expired, "Manual expiry sweep");
    Ok(Json(DataResponse::new(summary)))
}
