//! Staff account registration, login and session lookup.

use locker_core::error::CoreError;
use locker_core::phone::{mask_phone, validate_phone};
use locker_core::roles::UserRole;
use locker_core::types::DbId;
use locker_db::models::user::NewUser;
use locker_db::repositories::UserRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::jwt::{generate_access_token, JwtConfig, RevokedTokens};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

const PHONE_UNIQUE_CONSTRAINT: &str = "uq_users_phone";

/// A freshly registered account.
#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    pub user_id: DbId,
    pub role: UserRole,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoggedIn {
    pub user_id: DbId,
    pub role: UserRole,
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// The account behind a valid access token.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user_id: DbId,
    pub role: UserRole,
    pub phone: String,
}

/// Create an account with an Argon2id-hashed password.
///
/// A phone already registered fails with `PhoneAlreadyExists`, including
/// when a concurrent registration wins the unique constraint.
pub async fn register(
    pool: &PgPool,
    phone: &str,
    password: &str,
    role: &str,
) -> AppResult<Registered> {
    let phone = phone.trim();
    validate_phone("phone", phone)?;
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(CoreError::Validation)?;
    let role: UserRole = role.parse()?;

    if UserRepo::find_by_phone(pool, phone).await?.is_some() {
        return Err(CoreError::PhoneAlreadyExists.into());
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &NewUser {
            phone: phone.to_string(),
            password_hash,
            role,
        },
    )
    .await
    .map_err(|e| match e.as_database_error().and_then(|db| db.constraint()) {
        Some(PHONE_UNIQUE_CONSTRAINT) => AppError::Core(CoreError::PhoneAlreadyExists),
        _ => AppError::Database(e),
    })?;

    tracing::info!(user_id = %user.id, role = %user.role, phone = %mask_phone(&user.phone), "User registered");

    Ok(Registered {
        user_id: user.id,
        role: user.role,
    })
}

/// Check credentials and issue an access token.
///
/// An unknown phone and a wrong password both fail with
/// `InvalidCredentials`.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtConfig,
    phone: &str,
    password: &str,
) -> AppResult<LoggedIn> {
    let phone = phone.trim();
    if phone.is_empty() || password.is_empty() {
        return Err(CoreError::Validation("phone and password are required".into()).into());
    }

    let user = UserRepo::find_by_phone(pool, phone)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::warn!(phone = %mask_phone(phone), "Login with wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    let access_token = generate_access_token(user.id, user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(LoggedIn {
        user_id: user.id,
        role: user.role,
        access_token,
        expires_in: jwt.expires_in_secs(),
    })
}

/// Look up the token holder's account. A deleted account reads as an invalid
/// token.
pub async fn me(pool: &PgPool, user: &AuthUser) -> AppResult<Profile> {
    let account = UserRepo::find_by_id(pool, user.user_id)
        .await?
        .ok_or(CoreError::InvalidToken)?;
    Ok(Profile {
        user_id: account.id,
        role: account.role,
        phone: account.phone,
    })
}

/// Revoke the caller's token for the rest of its lifetime.
pub fn logout(revoked: &RevokedTokens, user: &AuthUser) {
    revoked.revoke(&user.jti, user.expires_at);
    tracing::info!(user_id = %user.user_id, "User logged out");
}
