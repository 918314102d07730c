/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user's id and email as claims.
/// Access and refresh tokens are distinguished by a `token_type` claim and
/// are signed with separate secrets, so a refresh token can never be replayed
/// as an access token even if the validation call site forgets to check.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: configurable; the server defaults to 15 minutes for
///   access tokens and 7 days for refresh tokens
/// - **Validation**: signature, expiration, issuer, and token-type checks
/// - **Secrets**: must be at least 32 bytes; enforced at config load
///
/// # Example
///
/// ```
/// use prepstack_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     "user@example.com",
///     TokenType::Access,
///     Duration::minutes(15),
/// );
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
///
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!", TokenType::Access)?;
/// assert_eq!(validated.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
const ISSUER: &str = "prepstack";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is of the wrong type for this operation
    #[error("Expected {expected} token, got {actual} token")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived)
    Access,

    /// Refresh token (long-lived, persisted server-side)
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the user's email
/// and the token type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// User email
    pub email: String,

    /// Issuer - always "prepstack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token type (access or refresh)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims expiring `expires_in` from now
    pub fn new(user_id: Uuid, email: &str, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature, expiration, not-before, issuer, and that the
/// token is of the expected type.
///
/// # Errors
///
/// - `JwtError::Expired` if past `exp`
/// - `JwtError::WrongType` if the `token_type` claim does not match
/// - `JwtError::ValidationError` for any other failure (bad signature,
///   malformed token, wrong issuer)
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: TokenType,
) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    let claims = token_data.claims;
    if claims.token_type != expected_type {
        return Err(JwtError::WrongType {
            expected: expected_type.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "a@b.com", TokenType::Access, Duration::minutes(15));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.iss, "prepstack");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "a@b.com", TokenType::Access, Duration::minutes(15));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated =
            validate_token(&token, SECRET, TokenType::Access).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.email, "a@b.com");
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "a@b.com",
            TokenType::Access,
            Duration::minutes(15),
        );
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-also-32-bytes-long!!!!", TokenType::Access);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "a@b.com",
            TokenType::Access,
            Duration::seconds(-3600),
        );
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET, TokenType::Access);

        assert!(matches!(result.unwrap_err(), JwtError::Expired));
    }

    #[test]
    fn test_token_type_mismatch() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "a@b.com",
            TokenType::Refresh,
            Duration::days(7),
        );
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, SECRET, TokenType::Access);
        assert!(matches!(result.unwrap_err(), JwtError::WrongType { .. }));
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "a@b.com", TokenType::Refresh, Duration::days(7));
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET, TokenType::Refresh).unwrap();
        assert_eq!(validated.sub, user_id);
    }
}
