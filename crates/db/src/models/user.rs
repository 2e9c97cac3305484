use locker_core::roles::UserRole;
use locker_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values for inserting a user whose password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub phone: String,
    pub password_hash: String,
    pub role: UserRole,
}
