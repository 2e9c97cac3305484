//! Handlers for the `/auth` resource (register, login, me, logout).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::auth;
use crate::state::AppState;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
    pub role: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let registered = auth::register(&state.pool, &input.phone, &input.password, &input.role).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(registered))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let logged_in = auth::login(&state.pool, &state.config.jwt, &input.phone, &input.password).await?;
    Ok(Json(DataResponse::new(logged_in)))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<impl IntoResponse> {
    let profile = auth::me(&state.pool, &user).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// POST /api/v1/auth/logout
///
/// Revokes the presented token; later requests with it get 401.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    auth::logout(&state.revoked_tokens, &user);
    Json(json!({ "success": true }))
}
