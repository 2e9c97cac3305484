//! Route definitions for the `/pickup` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pickup;
use crate::state::AppState;

/// Pickup routes mounted at `/pickup`.
///
/// ```text
/// POST /otp/request  -> request_otp
/// POST /otp/verify   -> verify_otp
/// GET  /parcels      -> list_pickup_parcels
/// POST /confirm      -> confirm_pickup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/otp/request", post(pickup::request_otp))
        .route("/otp/verify", post(pickup::verify_otp))
        .route("/parcels", get(pickup::list_pickup_parcels))
        .route("/confirm", post(pickup::confirm_pickup))
}
