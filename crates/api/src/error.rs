use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use locker_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{success, error_code, error}`
/// envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `locker_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed request body or parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A path or body identifier that is not a UUID.
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl AppError {
    /// The stable error code this error is reported under.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Core(core) => core.code(),
            AppError::Database(err) => known_sqlx_error(err).map_or("INTERNAL_ERROR", |(_, code, _)| code),
            AppError::BadRequest(_) => "INVALID_REQUEST",
            AppError::InvalidUuid(_) => "INVALID_UUID",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone()),
            AppError::InvalidUuid(raw) => (
                StatusCode::BAD_REQUEST,
                "INVALID_UUID",
                format!("'{raw}' is not a valid UUID"),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "success": false,
            "error_code": code,
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a domain error to its HTTP status, code and client-facing message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    let status = match err {
        CoreError::NotFound { .. } | CoreError::OtpNotFound => StatusCode::NOT_FOUND,
        CoreError::Validation(_) | CoreError::InvalidOtp => {
            StatusCode::BAD_REQUEST
        }
        CoreError::Conflict(_)
        | CoreError::NoAvailableCompartment
        | CoreError::InvalidStatusTransition { .. }
        | CoreError::InvalidCompartmentStatus { .. }
        | CoreError::LockerInactive
        | CoreError::OtpAlreadyUsed
        | CoreError::PhoneAlreadyExists => StatusCode::CONFLICT,
        CoreError::OtpExpired | CoreError::TokenExpired => StatusCode::GONE,
        CoreError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        CoreError::InvalidToken | CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            return internal();
        }
    };
    (status, err.code(), err.to_string())
}

/// Known database failures that are the client's fault rather than ours.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Lock timeouts (`55P03`) map to 409 `NO_AVAILABLE_COMPARTMENT`.
/// - Foreign key and check violations map to 400.
fn known_sqlx_error(err: &sqlx::Error) -> Option<(StatusCode, &'static str, String)> {
    match err {
        sqlx::Error::RowNotFound => Some((
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        )),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => Some((
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                )),
                Some("55P03") => Some((
                    StatusCode::CONFLICT,
                    "NO_AVAILABLE_COMPARTMENT",
                    "no available compartment".to_string(),
                )),
                Some("23503") => Some((
                    StatusCode::BAD_REQUEST,
                    "INVALID_INPUT",
                    "Referenced entity does not exist".to_string(),
                )),
                Some("23514") => Some((
                    StatusCode::BAD_REQUEST,
                    "INVALID_INPUT",
                    format!("Value violates check constraint: {constraint}"),
                )),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// Anything not covered by [`known_sqlx_error`] is logged and reported as a
/// sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    known_sqlx_error(err).unwrap_or_else(|| {
        tracing::error!(error = %err, "Database error");
        internal()
    })
}
