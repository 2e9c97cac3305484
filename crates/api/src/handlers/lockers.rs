//! Handlers for the public `/lockers` resource.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::admin;
use crate::state::AppState;

/// GET /api/v1/lockers/available
///
/// ACTIVE lockers with their location names.
pub async fn list_available_lockers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let lockers = admin::available_lockers(&state.pool).await?;
    Ok(Json(DataResponse::new(lockers)))
}
