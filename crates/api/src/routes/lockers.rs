use axum::routing::get;
use axum::Router;

use crate::handlers::lockers;
use crate::state::AppState;

/// Public locker routes mounted at `/lockers`.
pub fn router() -> Router<AppState> {
    Router::new().route("/available", get(lockers::list_available_lockers))
}
