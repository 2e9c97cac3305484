//! Route definitions for the `/parcels` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::parcels;
use crate::state::AppState;

/// Parcel routes mounted at `/parcels`.
///
/// ```text
/// POST /deposit        -> deposit_parcel
/// POST /               -> create_parcel
/// GET  /{id}           -> get_parcel
/// GET  /{id}/events    -> list_parcel_events
/// POST /{id}/reserve   -> reserve_parcel
/// POST /{id}/store     -> store_parcel
/// POST /{id}/ready     -> ready_parcel
/// POST /{id}/cancel    -> cancel_parcel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deposit", post(parcels::deposit_parcel))
        .route("/", post(parcels::create_parcel))
        .route("/{id}", get(parcels::get_parcel))
        .route("/{id}/events", get(parcels::list_parcel_events))
        .route("/{id}/reserve", post(parcels::reserve_parcel))
        .route("/{id}/store", post(parcels::store_parcel))
        .route("/{id}/ready", post(parcels::ready_parcel))
        .route("/{id}/cancel", post(parcels::cancel_parcel))
}
