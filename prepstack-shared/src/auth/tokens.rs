/// Access/refresh token pair lifecycle
///
/// `TokenService` owns everything stateful about sessions: it signs token
/// pairs, persists refresh tokens (hashed) for revocation, rotates pairs,
/// and revokes sessions. Access tokens are only ever verified, never stored.
///
/// # Rotation
///
/// `rotate` is the security-sensitive operation. The persisted record is
/// looked up and deleted, and the replacement inserted, inside a single
/// transaction with the row locked (`SELECT ... FOR UPDATE`). Two concurrent
/// rotations of the same token therefore serialize: the first wins, the
/// second finds no row and fails with `InvalidRefresh`. A stolen-then-reused
/// old refresh token fails the same way, signaling possible compromise.
///
/// # Example
///
/// ```no_run
/// use prepstack_shared::auth::tokens::{JwtConfig, TokenService};
/// # use prepstack_shared::models::user::User;
/// # async fn example(pool: sqlx::PgPool, user: User) -> anyhow::Result<()> {
/// let service = TokenService::new(pool, JwtConfig {
///     access_secret: "access-secret-at-least-32-bytes-long!".into(),
///     refresh_secret: "refresh-secret-at-least-32-bytes-lng!".into(),
///     ..Default::default()
/// });
///
/// let pair = service.issue_pair(&user, None).await?;
/// let auth_user = service.verify_access(&pair.access_token).await?;
/// assert_eq!(auth_user.id, user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::{self, Claims, JwtError, TokenType};
use crate::models::refresh_token::RefreshTokenRecord;
use crate::models::user::User;

/// JWT signing configuration
///
/// Access and refresh tokens use separate secrets so that one leaked secret
/// does not compromise both token classes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for access tokens (>= 32 bytes)
    pub access_secret: String,

    /// Secret for refresh tokens (>= 32 bytes)
    pub refresh_secret: String,

    /// Access token lifetime in seconds
    pub access_ttl_secs: i64,

    /// Refresh token lifetime in seconds
    pub refresh_ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_secs: 15 * 60,
            refresh_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

/// A freshly issued access/refresh token pair
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Resolved identity attached to authenticated requests
///
/// Handlers extract this from request extensions after the auth middleware
/// has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub level: i32,
    pub profile_image_url: Option<String>,
    pub position_id: Option<Uuid>,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            level: user.level,
            profile_image_url: user.profile_image_url.clone(),
            position_id: user.position_id,
        }
    }
}

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token failed signature or structural validation
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Token (or its persisted record) is past expiry
    #[error("Token has expired")]
    Expired,

    /// Refresh token has no persisted record (rotated, revoked, or forged)
    #[error("Refresh token is not recognized")]
    InvalidRefresh,

    /// Token subject no longer resolves to a user
    #[error("Token subject no longer exists")]
    UserNotFound,

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => TokenError::Expired,
            other => TokenError::Invalid(other.to_string()),
        }
    }
}

/// Issues, verifies, rotates, and revokes token pairs
#[derive(Clone)]
pub struct TokenService {
    pool: PgPool,
    config: Arc<JwtConfig>,
}

impl TokenService {
    /// Creates a new token service over the given pool and signing config
    pub fn new(pool: PgPool, config: JwtConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::seconds(self.config.access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::seconds(self.config.refresh_ttl_secs)
    }

    /// Signs an access/refresh pair for a user
    fn sign_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, TokenError> {
        let access_claims = Claims::new(user_id, email, TokenType::Access, self.access_ttl());
        let refresh_claims = Claims::new(user_id, email, TokenType::Refresh, self.refresh_ttl());

        Ok(TokenPair {
            access_token: jwt::create_token(&access_claims, &self.config.access_secret)?,
            refresh_token: jwt::create_token(&refresh_claims, &self.config.refresh_secret)?,
        })
    }

    /// Issues a new token pair for a user, replacing prior sessions
    ///
    /// Prior refresh rows for the user are deleted in the same transaction
    /// that persists the new one: one active session per user, or per device
    /// when a device label is supplied.
    pub async fn issue_pair(
        &self,
        user: &User,
        device: Option<&str>,
    ) -> Result<TokenPair, TokenError> {
        let pair = self.sign_pair(user.id, &user.email)?;
        let token_hash = RefreshTokenRecord::hash_token(&pair.refresh_token);
        let expires_at = Utc::now() + self.refresh_ttl();

        let mut tx = self.pool.begin().await?;
        RefreshTokenRecord::delete_for_user(&mut tx, user.id, device).await?;
        RefreshTokenRecord::insert(&mut tx, user.id, &token_hash, device, expires_at).await?;
        tx.commit().await?;

        Ok(pair)
    }

    /// Verifies an access token and resolves its user
    ///
    /// # Errors
    ///
    /// - `TokenError::Expired` when past expiry (the middleware treats this
    ///   as "try the refresh token")
    /// - `TokenError::Invalid` on signature/type failure
    /// - `TokenError::UserNotFound` when the subject row is gone
    pub async fn verify_access(&self, token: &str) -> Result<AuthUser, TokenError> {
        let claims = jwt::validate_token(token, &self.config.access_secret, TokenType::Access)?;

        let user = User::find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or(TokenError::UserNotFound)?;

        Ok(AuthUser::from(&user))
    }

    /// Exchanges a refresh token for a new pair, invalidating the old one
    ///
    /// The whole exchange is atomic: either the old record is deleted and
    /// the new one persisted, or neither happens.
    ///
    /// # Errors
    ///
    /// - `TokenError::InvalidRefresh` when no persisted record matches
    ///   (already rotated, revoked, or never issued)
    /// - `TokenError::Expired` when the token or its record is past expiry;
    ///   the stale record is deleted as a side effect
    pub async fn rotate(&self, refresh_token: &str) -> Result<(AuthUser, TokenPair), TokenError> {
        let claims = jwt::validate_token(
            refresh_token,
            &self.config.refresh_secret,
            TokenType::Refresh,
        )?;

        let token_hash = RefreshTokenRecord::hash_token(refresh_token);

        let mut tx = self.pool.begin().await?;

        let record = RefreshTokenRecord::find_by_hash_for_update(&mut tx, &token_hash)
            .await?
            .ok_or(TokenError::InvalidRefresh)?;

        if record.is_expired() {
            RefreshTokenRecord::delete(&mut tx, record.id).await?;
            tx.commit().await?;
            return Err(TokenError::Expired);
        }

        let user = User::find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or(TokenError::UserNotFound)?;

        let pair = self.sign_pair(user.id, &user.email)?;
        let new_hash = RefreshTokenRecord::hash_token(&pair.refresh_token);
        let expires_at = Utc::now() + self.refresh_ttl();

        RefreshTokenRecord::delete(&mut tx, record.id).await?;
        RefreshTokenRecord::insert(
            &mut tx,
            user.id,
            &new_hash,
            record.device.as_deref(),
            expires_at,
        )
        .await?;
        tx.commit().await?;

        Ok((AuthUser::from(&user), pair))
    }

    /// Revokes every session for a user (logout, password change)
    pub async fn revoke(&self, user_id: Uuid) -> Result<u64, TokenError> {
        Ok(RefreshTokenRecord::revoke_all(&self.pool, user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults() {
        let config = JwtConfig::default();
        assert_eq!(config.access_ttl_secs, 900);
        assert_eq!(config.refresh_ttl_secs, 604_800);
    }

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(
            TokenError::from(JwtError::Expired),
            TokenError::Expired
        ));
        assert!(matches!(
            TokenError::from(JwtError::ValidationError("bad".into())),
            TokenError::Invalid(_)
        ));
    }

    // issue/rotate/revoke hit the database; covered by the integration tests
    // in prepstack-api/tests/.
}
