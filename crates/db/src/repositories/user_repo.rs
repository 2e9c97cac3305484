//! Repository for the `users` table.

use locker_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user::{NewUser, User};

const COLUMNS: &str = "id, phone, password_hash, role, created_at, updated_at";

/// Provides lookups and inserts for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user. A taken phone fails on `uq_users_phone`.
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: &NewUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (phone, password_hash, role) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_phone<'e, E: PgExecutor<'e>>(
        executor: E,
        phone: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE phone = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(executor)
            .await
    }
}
