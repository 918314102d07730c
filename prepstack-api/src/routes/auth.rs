/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Register a new account
/// - `POST /api/auth/login` - Login; sets token cookies
/// - `POST /api/auth/refresh` - Rotate the token pair from the refresh cookie
/// - `POST /api/auth/logout` - Revoke sessions and clear cookies
/// - `GET  /api/auth/availability` - Email/nickname availability check
///
/// Login, refresh, and the transparent refresh in the auth middleware all
/// set the same pair of cookies; logout clears them.

use crate::{
    app::AppState,
    cookies::{self, REFRESH_COOKIE},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use prepstack_shared::auth::{
    password,
    service::AvailabilityField,
    tokens::{AuthUser, TokenPair},
};
use prepstack_shared::models::user::User;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also checked for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display nickname
    #[validate(length(min = 2, max = 50, message = "Nickname must be 2-50 characters"))]
    pub nickname: String,
}

/// Public view of a user account
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
    pub level: i32,
    pub position_id: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_image_url: user.profile_image_url.clone(),
            level: user.level,
            position_id: user.position_id.map(|id| id.to_string()),
        }
    }
}

impl From<&AuthUser> for UserResponse {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            profile_image_url: user.profile_image_url.clone(),
            level: user.level,
            position_id: user.position_id.map(|id| id.to_string()),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,

    /// Optional device label; scopes session replacement to this device
    #[validate(length(max = 100, message = "Device label must be at most 100 characters"))]
    pub device: Option<String>,
}

/// Login / refresh response
///
/// The refresh token travels only as a cookie, never in the body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub user: UserResponse,
}

/// Availability check query
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// "email" or "nickname"
    pub field: String,

    /// Value to check
    pub value: String,
}

/// Availability check response
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Attaches the token cookies to a JSON response
fn with_token_cookies<T: Serialize>(
    state: &AppState,
    status: StatusCode,
    body: T,
    pair: &TokenPair,
) -> Response {
    let mut response = (status, Json(body)).into_response();
    cookies::set_token_cookies(
        response.headers_mut(),
        pair,
        state.config.jwt.access_ttl_secs,
        state.config.jwt.refresh_ttl_secs,
        state.config.api.production,
    );
    response
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {"email": "a@b.com", "password": "Abc12345!", "nickname": "tester1"}
/// ```
///
/// # Errors
///
/// - `422`: validation failed
/// - `409 DUPLICATE/EMAIL` / `409 DUPLICATE/NICKNAME`: value already taken
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![crate::error::ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let user = state
        .auth
        .register(&req.email, &req.password, &req.nickname)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Login with email and password
///
/// On success, sets the `accessToken` and `refreshToken` cookies and returns
/// the access token with the user profile. Exactly one refresh session per
/// user (or per device when a label is sent) survives this call.
///
/// # Errors
///
/// - `401 AUTH/UNAUTHORIZED`: unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let (user, pair) = state
        .auth
        .authenticate(&req.email, &req.password, req.device.as_deref())
        .await?;

    let body = TokenResponse {
        access_token: pair.access_token.clone(),
        user: UserResponse::from(&user),
    };

    Ok(with_token_cookies(&state, StatusCode::OK, body, &pair))
}

/// Rotate the token pair using the refresh cookie
///
/// The old refresh token is invalidated; replaying it afterwards fails.
///
/// # Errors
///
/// - `401 AUTH/UNAUTHORIZED`: missing cookie or unrecognized token
/// - `401 AUTH/TOKEN_EXPIRED`: refresh token past expiry
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let refresh_token = cookies::extract_cookie(&headers, REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("Missing refresh token".to_string()))?;

    let (user, pair) = state.tokens.rotate(&refresh_token).await?;

    let body = TokenResponse {
        access_token: pair.access_token.clone(),
        user: UserResponse::from(&user),
    };

    Ok(with_token_cookies(&state, StatusCode::OK, body, &pair))
}

/// Logout: revoke all refresh sessions and clear cookies
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Response> {
    state.tokens.revoke(user.id).await?;

    let mut response = Json(serde_json::json!({ "message": "Logged out" })).into_response();
    cookies::clear_token_cookies(response.headers_mut());
    Ok(response)
}

/// Email/nickname availability check
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/availability?field=email&value=a@b.com
/// ```
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let field = AvailabilityField::parse(&query.field).ok_or_else(|| {
        ApiError::BadRequest("field must be \"email\" or \"nickname\"".to_string())
    })?;

    let available = state.auth.check_availability(field, &query.value).await?;

    Ok(Json(AvailabilityResponse { available }))
}
