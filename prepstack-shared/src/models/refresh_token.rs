/// Refresh token persistence
///
/// Refresh tokens are stored server-side as SHA-256 hashes so that a
/// database leak does not expose usable credentials. Rows are deleted on
/// rotation or logout; a token whose row is gone can never be exchanged
/// again, which is what makes rotation detect replay of a stolen token.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE refresh_tokens (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     device VARCHAR(100),
///     expires_at TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Persisted refresh-token record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// SHA-256 hex of the token string (never the token itself)
    pub token_hash: String,

    /// Optional device label for per-device sessions
    pub device: Option<String>,

    /// When the token stops being exchangeable
    pub expires_at: DateTime<Utc>,

    /// When the token was issued
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Hashes a refresh token for storage or lookup
    ///
    /// # Example
    ///
    /// ```
    /// use prepstack_shared::models::refresh_token::RefreshTokenRecord;
    ///
    /// let hash = RefreshTokenRecord::hash_token("eyJ...");
    /// assert_eq!(hash.len(), 64);
    /// ```
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Inserts a new record using the caller's transaction
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        token_hash: &str,
        device: Option<&str>,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, device, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, token_hash, device, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(device)
        .bind(expires_at)
        .fetch_one(&mut **tx)
        .await
    }

    /// Looks up a record by token hash, locking the row for the rest of the
    /// transaction
    ///
    /// The lock serializes concurrent rotation attempts on the same token:
    /// the loser of the race sees the row already deleted and fails.
    pub async fn find_by_hash_for_update(
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            r#"
            SELECT id, user_id, token_hash, device, expires_at, created_at
            FROM refresh_tokens
            WHERE token_hash = $1
            FOR UPDATE
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Deletes a record by ID within the caller's transaction
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes prior sessions for a user
    ///
    /// With a device label, only that device's sessions are replaced;
    /// without one, every session for the user is removed (single active
    /// session).
    pub async fn delete_for_user(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        device: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result = match device {
            Some(device) => {
                sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1 AND device = $2")
                    .bind(user_id)
                    .bind(device)
                    .execute(&mut **tx)
                    .await?
            }
            None => {
                sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    /// Deletes every record for a user (logout, password change)
    pub async fn revoke_all(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Checks whether the record is past its expiry
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let h1 = RefreshTokenRecord::hash_token("token-a");
        let h2 = RefreshTokenRecord::hash_token("token-a");
        let h3 = RefreshTokenRecord::hash_token("token-b");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_is_expired() {
        let record = RefreshTokenRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            token_hash: "h".repeat(64),
            device: None,
            expires_at: Utc::now() - chrono::Duration::seconds(1),
            created_at: Utc::now() - chrono::Duration::days(7),
        };

        assert!(record.is_expired());
    }
}
