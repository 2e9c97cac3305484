//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use locker_core::error::CoreError;
use locker_core::roles::UserRole;
use locker_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT in the `Authorization` header.
///
/// A missing, malformed, expired or logged-out token is rejected with 401
/// `INVALID_TOKEN`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: UserRole,
    /// Token id, used to revoke this token on logout.
    pub jti: String,
    /// Token expiry (UTC Unix timestamp).
    pub expires_at: i64,
}

/// The token from `Bearer <token>`, if the header has that shape.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(CoreError::InvalidToken)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            CoreError::InvalidToken
        })?;

        if state.revoked_tokens.is_revoked(&claims.jti) {
            return Err(CoreError::InvalidToken.into());
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }
}
