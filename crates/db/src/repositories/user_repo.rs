//! Repository for the `users` table and the `user_media` ownership set.

use mediatrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, password_hash, token_version, created_at, updated_at";

/// Provides account lookups and ownership checks.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email fails with the `uq_users_email` unique violation.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by normalized email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Current access-token version of a user, or `None` if the user is gone.
    pub async fn token_version(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT token_version FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(version,)| version))
    }

    /// Bump the token version, invalidating every access token issued so far.
    ///
    /// Returns the new version, or `None` if the user does not exist.
    pub async fn bump_token_version(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE users SET token_version = token_version + 1
             WHERE id = $1
             RETURNING token_version",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(version,)| version))
    }

    /// Whether `media_id` is in the user's ownership reference set.
    pub async fn owns_media(
        pool: &PgPool,
        user_id: DbId,
        media_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (owned,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM user_media WHERE user_id = $1 AND media_id = $2
             )",
        )
        .bind(user_id)
        .bind(media_id)
        .fetch_one(pool)
        .await?;
        Ok(owned)
    }

    /// Size of the user's ownership reference set.
    pub async fn media_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_media WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
