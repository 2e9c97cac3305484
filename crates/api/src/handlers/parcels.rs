//! Handlers for the `/parcels` resource.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use locker_core::types::Timestamp;
use locker_db::models::parcel::CreateParcel;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_id;
use crate::response::DataResponse;
use crate::services::parcels;
use crate::state::AppState;

/// Optional body for `POST /parcels/{id}/ready`.
#[derive(Debug, Default, Deserialize)]
pub struct ReadyParcel {
    pub expires_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Deposit
// ---------------------------------------------------------------------------

/// POST /api/v1/parcels/deposit
///
/// One-shot deposit: allocate a compartment and make the parcel ready for
/// pickup. Returns 201 with the compartment assignment and pickup code.
pub async fn deposit_parcel(
    State(state): State<AppState>,
    payload: Result<Json<CreateParcel>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let deposit = parcels::deposit(
        &state.pool,
        &input,
        Utc::now(),
        state.config.parcel_pickup_window(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(deposit))))
}

// ---------------------------------------------------------------------------
// Create / get
// ---------------------------------------------------------------------------

/// POST /api/v1/parcels
///
/// Register a parcel in CREATED without allocating a compartment.
pub async fn create_parcel(
    State(state): State<AppState>,
    payload: Result<Json<CreateParcel>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let created = parcels::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// GET /api/v1/parcels/{id}
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let parcel = parcels::get(&state.pool, parse_id(&id)?).await?;
    Ok(Json(DataResponse::new(parcel)))
}

/// GET /api/v1/parcels/{id}/events
///
/// Event timeline, oldest first.
pub async fn list_parcel_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let events = parcels::events(&state.pool, parse_id(&id)?).await?;
    Ok(Json(DataResponse::new(events)))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/parcels/{id}/reserve
pub async fn reserve_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let parcel = parcels::reserve(&state.pool, parse_id(&id)?, Utc::now()).await?;
    Ok(Json(DataResponse::new(parcel)))
}

/// POST /api/v1/parcels/{id}/store
pub async fn store_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let parcel = parcels::store(&state.pool, parse_id(&id)?, Utc::now()).await?;
    Ok(Json(DataResponse::new(parcel)))
}

/// POST /api/v1/parcels/{id}/ready
///
/// Body is optional; `{"expires_at": "..."}` overrides the pickup deadline.
pub async fn ready_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let input: ReadyParcel = if body.is_empty() {
        ReadyParcel::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))?
    };

    let parcel = parcels::ready(
        &state.pool,
        id,
        input.expires_at,
        Utc::now(),
        state.config.parcel_pickup_window(),
    )
    .await?;
    Ok(Json(DataResponse::new(parcel)))
}

/// POST /api/v1/parcels/{id}/cancel
pub async fn cancel_parcel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let parcel = parcels::cancel(&state.pool, parse_id(&id)?).await?;
    Ok(Json(DataResponse::new(parcel)))
}
