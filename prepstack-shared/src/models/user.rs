/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     nickname VARCHAR(50) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     profile_image_url VARCHAR(512),
///     level INTEGER NOT NULL DEFAULT 1,
///     position_id UUID REFERENCES positions(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Email and nickname are unique; the constraints (`users_email_key`,
/// `users_nickname_key`) are the concurrency guard for signup races.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Display nickname, unique across all users
    pub nickname: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Optional profile image URL
    pub profile_image_url: Option<String>,

    /// Gamification level, starts at 1
    pub level: i32,

    /// Optional job-position reference
    pub position_id: Option<Uuid>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub nickname: String,
    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

/// Job-position reference row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    pub id: Uuid,
    pub name: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Surfaces the unique-constraint violation when email or nickname is
    /// already taken; callers translate that to a duplicate error.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, nickname, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, nickname, password_hash, profile_image_url,
                      level, position_id, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.nickname)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password_hash, profile_image_url,
                   level, position_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password_hash, profile_image_url,
                   level, position_id, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by nickname
    pub async fn find_by_nickname(
        pool: &PgPool,
        nickname: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, nickname, password_hash, profile_image_url,
                   level, position_id, created_at, updated_at
            FROM users
            WHERE nickname = $1
            "#,
        )
        .bind(nickname)
        .fetch_optional(pool)
        .await
    }

    /// Updates the nickname
    ///
    /// Returns true if the user existed and was updated.
    pub async fn update_nickname(
        pool: &PgPool,
        id: Uuid,
        nickname: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET nickname = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(nickname)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the password hash
    pub async fn update_password_hash(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the job-position reference
    pub async fn update_position(
        pool: &PgPool,
        id: Uuid,
        position_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET position_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(position_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates the profile image URL
    pub async fn update_profile_image(
        pool: &PgPool,
        id: Uuid,
        url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET profile_image_url = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(url)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl Position {
    /// Lists all job positions
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Position>("SELECT id, name FROM positions ORDER BY name")
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            email: "test@example.com".to_string(),
            nickname: "tester1".to_string(),
            password_hash: "$argon2id$...".to_string(),
        };

        assert_eq!(create_user.email, "test@example.com");
        assert_eq!(create_user.nickname, "tester1");
    }

    // Database operations are covered by the integration tests in
    // prepstack-api/tests/.
}
