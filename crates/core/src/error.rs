use crate::status::{CompartmentStatus, ParcelStatus};
use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every variant carries a stable machine-readable code (see [`CoreError::code`])
/// that the API layer exposes as `error_code`. Callers match on variants, never
/// on messages.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("no available compartment")]
    NoAvailableCompartment,

    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ParcelStatus, to: ParcelStatus },

    #[error("invalid compartment status {status}")]
    InvalidCompartmentStatus { status: CompartmentStatus },

    #[error("locker is not active")]
    LockerInactive,

    #[error("otp not found")]
    OtpNotFound,

    #[error("otp expired")]
    OtpExpired,

    #[error("otp already used")]
    OtpAlreadyUsed,

    #[error("invalid otp")]
    InvalidOtp,

    #[error("too many requests")]
    TooManyRequests,

    #[error("invalid token")]
    InvalidToken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("phone already exists")]
    PhoneAlreadyExists,

    #[error("token expired")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { entity, .. } => match *entity {
                "Parcel" => "PARCEL_NOT_FOUND",
                "Locker" => "LOCKER_NOT_FOUND",
                "Location" => "LOCATION_NOT_FOUND",
                "Compartment" => "COMPARTMENT_NOT_FOUND",
                _ => "NOT_FOUND",
            },
            CoreError::Validation(_) => "INVALID_REQUEST",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::NoAvailableCompartment => "NO_AVAILABLE_COMPARTMENT",
            CoreError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            CoreError::InvalidCompartmentStatus { .. } => "INVALID_COMPARTMENT_STATUS",
            CoreError::LockerInactive => "LOCKER_INACTIVE",
            CoreError::OtpNotFound => "OTP_NOT_FOUND",
            CoreError::OtpExpired => "OTP_EXPIRED",
            CoreError::OtpAlreadyUsed => "OTP_ALREADY_USED",
            CoreError::InvalidOtp => "INVALID_OTP",
            CoreError::TooManyRequests => "TOO_MANY_REQUESTS",
            CoreError::InvalidToken => "INVALID_TOKEN",
            CoreError::InvalidCredentials => "INVALID_CREDENTIALS",
            CoreError::PhoneAlreadyExists => "PHONE_ALREADY_EXISTS",
            CoreError::TokenExpired => "TOKEN_EXPIRED",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for a parcel-not-found error.
    pub fn parcel_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Parcel",
            id,
        }
    }

    /// Shorthand for a locker-not-found error.
    pub fn locker_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Locker",
            id,
        }
    }
}
