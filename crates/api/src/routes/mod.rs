pub mod admin;
pub mod auth;
pub mod health;
pub mod lockers;
pub mod parcels;
pub mod pickup;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /parcels/deposit                                 one-shot deposit (POST)
/// /parcels                                         create (POST)
/// /parcels/{id}                                    get
/// /parcels/{id}/events                             event timeline
/// /parcels/{id}/reserve                            CREATED -> RESERVED (POST)
/// /parcels/{id}/store                              RESERVED -> STORED (POST)
/// /parcels/{id}/ready                              STORED -> PICKUP_READY (POST)
/// /parcels/{id}/cancel                             cancel (POST)
///
/// /pickup/otp/request                              issue OTP (POST)
/// /pickup/otp/verify                               verify OTP, issue token (POST)
/// /pickup/parcels                                  ready parcels (X-Pickup-Token)
/// /pickup/confirm                                  confirm pickup (X-Pickup-Token)
///
/// /lockers/available                               active lockers
///
/// /auth/register                                   create account (POST)
/// /auth/login                                      issue access token (POST)
/// /auth/me                                         token holder (Bearer)
/// /auth/logout                                     revoke token (POST, Bearer)
///
/// /admin/*                                         all require an ADMIN Bearer token
/// /admin/locations                                 create (POST)
/// /admin/lockers                                   create (POST)
/// /admin/lockers/{id}/status                       update status (PATCH)
/// /admin/lockers/{id}/compartments                 create bulk (POST), list
/// /admin/overview                                  counts
/// /admin/parcels/expire                            run expiry sweep (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/parcels", parcels::router())
        .nest("/pickup", pickup::router())
        .nest("/lockers", lockers::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
