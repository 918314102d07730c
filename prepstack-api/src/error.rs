/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`; `ApiError` converts into an HTTP
/// status plus a JSON body of the shape `{"code": "...", "message": "..."}`
/// (validation failures add a `details` array). Codes are machine-readable
/// and stable; clients branch on `code`, never on `message`.
///
/// Internal failures (database, hashing) are logged with full detail and
/// reported to the caller as a generic message; internals never leak.
///
/// # Example
///
/// ```ignore
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     let data = fetch_data().await?;
///     Ok(Json(json!({ "data": data })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prepstack_shared::auth::service::AuthServiceError;
use prepstack_shared::auth::tokens::TokenError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Which unique value a duplicate error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Nickname,
    Favorite,
}

impl DuplicateField {
    pub fn code(&self) -> &'static str {
        match self {
            DuplicateField::Email => "DUPLICATE/EMAIL",
            DuplicateField::Nickname => "DUPLICATE/NICKNAME",
            DuplicateField::Favorite => "DUPLICATE/FAVORITE",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            DuplicateField::Email => "Email is already registered",
            DuplicateField::Nickname => "Nickname is already taken",
            DuplicateField::Favorite => "Already favorited",
        }
    }
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Access token expired and no refresh was possible (401)
    TokenExpired,

    /// Forbidden (403) - ownership/permission failure
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - unique constraint
    Duplicate(DuplicateField),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal database failure (500); detail is logged, not returned
    DatabaseError(String),

    /// Any other internal failure (500); detail is logged, not returned
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code (e.g. "DUPLICATE/EMAIL")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::TokenExpired => write!(f, "Token expired"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Duplicate(field) => write!(f, "Conflict: {}", field.message()),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "COMMON/BAD_REQUEST", msg, None),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "AUTH/UNAUTHORIZED", msg, None)
            }
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH/TOKEN_EXPIRED",
                "Token has expired".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "AUTH/FORBIDDEN", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "COMMON/NOT_FOUND", msg, None),
            ApiError::Duplicate(field) => (
                StatusCode::CONFLICT,
                field.code(),
                field.message().to_string(),
                None,
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION/FIELD",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON/DATABASE_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON/INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations re-map to duplicate errors by constraint
/// name; everything else is an internal database error.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Duplicate(DuplicateField::Email);
                    }
                    if constraint.contains("nickname") {
                        return ApiError::Duplicate(DuplicateField::Nickname);
                    }
                    if constraint.contains("favorites_user_target") {
                        return ApiError::Duplicate(DuplicateField::Favorite);
                    }
                    if constraint.ends_with("_fkey") {
                        return ApiError::NotFound("Referenced resource not found".to_string());
                    }
                }
                ApiError::DatabaseError(db_err.to_string())
            }
            _ => ApiError::DatabaseError(err.to_string()),
        }
    }
}

/// Convert token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::InvalidRefresh => {
                ApiError::Unauthorized("Refresh token is not recognized".to_string())
            }
            TokenError::Invalid(msg) => ApiError::Unauthorized(msg),
            TokenError::UserNotFound => {
                ApiError::Unauthorized("Token subject no longer exists".to_string())
            }
            TokenError::Database(err) => ApiError::from(err),
        }
    }
}

/// Convert account-service errors to API errors
impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::DuplicateEmail => ApiError::Duplicate(DuplicateField::Email),
            AuthServiceError::DuplicateNickname => ApiError::Duplicate(DuplicateField::Nickname),
            // Do not reveal which credential was wrong
            AuthServiceError::UserNotFound | AuthServiceError::InvalidPassword => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthServiceError::PasswordMismatch => {
                ApiError::Unauthorized("Current password does not match".to_string())
            }
            AuthServiceError::Password(err) => ApiError::InternalError(err.to_string()),
            AuthServiceError::Token(err) => ApiError::from(err),
            AuthServiceError::Database(err) => ApiError::from(err),
        }
    }
}

/// Convert validator failures into the 422 details shape
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Question not found".to_string());
        assert_eq!(err.to_string(), "Not found: Question not found");
    }

    #[test]
    fn test_duplicate_codes() {
        assert_eq!(DuplicateField::Email.code(), "DUPLICATE/EMAIL");
        assert_eq!(DuplicateField::Nickname.code(), "DUPLICATE/NICKNAME");
        assert_eq!(DuplicateField::Favorite.code(), "DUPLICATE/FAVORITE");
    }

    #[test]
    fn test_auth_service_error_mapping_hides_which_credential() {
        let a = ApiError::from(AuthServiceError::UserNotFound);
        let b = ApiError::from(AuthServiceError::InvalidPassword);

        match (a, b) {
            (ApiError::Unauthorized(msg_a), ApiError::Unauthorized(msg_b)) => {
                assert_eq!(msg_a, msg_b);
            }
            other => panic!("expected Unauthorized pair, got {:?}", other),
        }
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            ApiError::from(TokenError::Expired),
            ApiError::TokenExpired
        ));
        assert!(matches!(
            ApiError::from(TokenError::InvalidRefresh),
            ApiError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        assert!(matches!(
            ApiError::from(sqlx::Error::RowNotFound),
            ApiError::NotFound(_)
        ));
    }
}
