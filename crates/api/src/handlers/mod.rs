pub mod admin;
pub mod auth;
pub mod lockers;
pub mod parcels;
pub mod pickup;

use locker_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Parse a path segment as a UUID, reporting `INVALID_UUID` otherwise.
pub(crate) fn parse_id(raw: &str) -> AppResult<DbId> {
    raw.parse::<DbId>()
        .map_err(|_| AppError::InvalidUuid(raw.to_string()))
}
