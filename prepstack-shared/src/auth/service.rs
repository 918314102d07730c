/// Account operations: registration, authentication, credential changes
///
/// `AuthService` is constructed once with its dependencies (pool + token
/// service) and shared via application state. Duplicate email/nickname are
/// pre-checked for friendly errors, but the unique constraints remain the
/// authoritative guard: a losing race surfaces as a constraint violation
/// that the API layer maps to the same duplicate error.

use sqlx::PgPool;
use uuid::Uuid;

use super::password::{self, PasswordError};
use super::tokens::{TokenError, TokenPair, TokenService};
use crate::models::user::{CreateUser, User};

/// Which unique field an availability check targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityField {
    Email,
    Nickname,
}

impl AvailabilityField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(AvailabilityField::Email),
            "nickname" => Some(AvailabilityField::Nickname),
            _ => None,
        }
    }
}

/// Error type for account operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Email already registered
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Nickname already taken
    #[error("Nickname is already taken")]
    DuplicateNickname,

    /// No account matches the given email
    #[error("No account matches the given email")]
    UserNotFound,

    /// Password hash mismatch during login
    #[error("Invalid password")]
    InvalidPassword,

    /// Old-password check failed during password change
    #[error("Current password does not match")]
    PasswordMismatch,

    /// Password hashing failure
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token issuance failure
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Registration, login, and credential management
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self { pool, tokens }
    }

    /// Returns true if no existing user holds the given email or nickname
    pub async fn check_availability(
        &self,
        field: AvailabilityField,
        value: &str,
    ) -> Result<bool, AuthServiceError> {
        let existing = match field {
            AvailabilityField::Email => User::find_by_email(&self.pool, value).await?,
            AvailabilityField::Nickname => User::find_by_nickname(&self.pool, value).await?,
        };

        Ok(existing.is_none())
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// `DuplicateEmail`/`DuplicateNickname` when either value is taken. The
    /// pre-checks keep the common case friendly; concurrent signups losing
    /// the race hit the unique constraint instead and are re-mapped by the
    /// API error layer.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<User, AuthServiceError> {
        if User::find_by_email(&self.pool, email).await?.is_some() {
            return Err(AuthServiceError::DuplicateEmail);
        }
        if User::find_by_nickname(&self.pool, nickname).await?.is_some() {
            return Err(AuthServiceError::DuplicateNickname);
        }

        let password_hash = password::hash_password(password)?;

        let user = User::create(
            &self.pool,
            CreateUser {
                email: email.to_string(),
                nickname: nickname.to_string(),
                password_hash,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "Registered new user");
        Ok(user)
    }

    /// Verifies credentials and issues a token pair
    ///
    /// # Errors
    ///
    /// `UserNotFound` when the email is unknown, `InvalidPassword` on hash
    /// mismatch.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        device: Option<&str>,
    ) -> Result<(User, TokenPair), AuthServiceError> {
        let user = User::find_by_email(&self.pool, email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(AuthServiceError::InvalidPassword);
        }

        let pair = self.tokens.issue_pair(&user, device).await?;
        Ok((user, pair))
    }

    /// Changes a user's nickname
    ///
    /// # Errors
    ///
    /// `DuplicateNickname` when the new nickname is already held by another
    /// user.
    pub async fn change_nickname(
        &self,
        user_id: Uuid,
        new_nickname: &str,
    ) -> Result<(), AuthServiceError> {
        if let Some(existing) = User::find_by_nickname(&self.pool, new_nickname).await? {
            if existing.id != user_id {
                return Err(AuthServiceError::DuplicateNickname);
            }
        }

        User::update_nickname(&self.pool, user_id, new_nickname).await?;
        Ok(())
    }

    /// Changes a user's password after verifying the old one
    ///
    /// All refresh sessions are revoked afterwards, forcing re-login
    /// everywhere.
    ///
    /// # Errors
    ///
    /// `PasswordMismatch` when the old password does not verify.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthServiceError> {
        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        if !password::verify_password(old_password, &user.password_hash)? {
            return Err(AuthServiceError::PasswordMismatch);
        }

        let password_hash = password::hash_password(new_password)?;
        User::update_password_hash(&self.pool, user_id, &password_hash).await?;
        self.tokens.revoke(user_id).await?;

        tracing::info!(user_id = %user_id, "Password changed, sessions revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_field_parse() {
        assert_eq!(
            AvailabilityField::parse("email"),
            Some(AvailabilityField::Email)
        );
        assert_eq!(
            AvailabilityField::parse("nickname"),
            Some(AvailabilityField::Nickname)
        );
        assert_eq!(AvailabilityField::parse("phone"), None);
    }
}
