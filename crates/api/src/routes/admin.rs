//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// POST  /locations                   -> create_location
/// POST  /lockers                     -> create_locker
/// PATCH /lockers/{id}/status         -> update_locker_status
/// POST  /lockers/{id}/compartments   -> create_compartments
/// GET   /lockers/{id}/compartments   -> list_compartments
/// GET   /overview                    -> get_overview
/// POST  /parcels/expire              -> expire_parcels
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", post(admin::create_location))
        .route("/lockers", post(admin::create_locker))
        .route("/lockers/{id}/status", patch(admin::update_locker_status))
        .route(
            "/lockers/{id}/compartments",
            get(admin::list_compartments).post(admin::create_compartments),
        )
        .route("/overview", get(admin::get_overview))
        .route("/parcels/expire", post(admin::expire_parcels))
}
