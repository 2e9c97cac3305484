//! Handlers for the `/pickup` resource.
//!
//! OTP endpoints are public. Listing and confirmation require the
//! `X-Pickup-Token` header issued by a successful verification.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use locker_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::{otp, pickup};
use crate::state::AppState;

/// Header carrying the pickup-session token.
pub const PICKUP_TOKEN_HEADER: &str = "x-pickup-token";

#[derive(Debug, Deserialize)]
pub struct RequestOtp {
    pub phone: String,
    pub parcel_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtp {
    pub phone: String,
    pub otp_ref: String,
    pub otp_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPickup {
    pub parcel_id: DbId,
}

fn pickup_token(headers: &HeaderMap) -> &str {
    headers
        .get(PICKUP_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// OTP
// ---------------------------------------------------------------------------

/// POST /api/v1/pickup/otp/request
pub async fn request_otp(
    State(state): State<AppState>,
    payload: Result<Json<RequestOtp>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let issued = otp::request(
        &state.pool,
        state.rate_limiter.as_ref(),
        state.notifier.as_ref(),
        &input.phone,
        input.parcel_id,
        state.config.otp_ttl(),
        Utc::now(),
    )
    .await?;
    Ok(Json(DataResponse::new(issued)))
}

/// POST /api/v1/pickup/otp/verify
pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<VerifyOtp>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let verified = otp::verify(
        &state.pool,
        state.token_store.as_ref(),
        &input.phone,
        &input.otp_ref,
        &input.otp_code,
        state.config.pickup_token_ttl(),
        Utc::now(),
    )
    .await?;
    Ok(Json(DataResponse::new(verified)))
}

// ---------------------------------------------------------------------------
// Pickup session
// ---------------------------------------------------------------------------

/// GET /api/v1/pickup/parcels
pub async fn list_pickup_parcels(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let parcels = pickup::list_parcels(
        &state.pool,
        state.token_store.as_ref(),
        pickup_token(&headers),
        Utc::now(),
    )
    .await?;
    Ok(Json(DataResponse::new(parcels)))
}

/// POST /api/v1/pickup/confirm
pub async fn confirm_pickup(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ConfirmPickup>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let confirmed = pickup::confirm(
        &state.pool,
        state.token_store.as_ref(),
        pickup_token(&headers),
        input.parcel_id,
        Utc::now(),
    )
    .await?;
    Ok(Json(DataResponse::new(confirmed)))
}
