/// User profile and credential endpoints
///
/// All routes require authentication.
///
/// # Endpoints
///
/// - `GET   /api/users/me` - Current profile
/// - `GET   /api/users/positions` - Available job positions
/// - `PATCH /api/users/change-nickname`
/// - `PATCH /api/users/change-password` - Also revokes all sessions
/// - `PATCH /api/users/change-position`
/// - `PATCH /api/users/profile-image` - Set after a presigned upload

use crate::{app::AppState, error::ApiResult, routes::auth::UserResponse};
use axum::{extract::State, Extension, Json};
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::models::user::Position;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Nickname change request
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeNicknameRequest {
    #[validate(length(min = 2, max = 50, message = "Nickname must be 2-50 characters"))]
    pub nickname: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Position change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePositionRequest {
    /// New position; null clears it
    pub position_id: Option<Uuid>,
}

/// Generic acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Current user's profile
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse::from(&user)))
}

/// Available job positions
pub async fn list_positions(State(state): State<AppState>) -> ApiResult<Json<Vec<Position>>> {
    Ok(Json(Position::list(&state.db).await?))
}

/// Change the current user's nickname
///
/// # Errors
///
/// - `409 DUPLICATE/NICKNAME`: nickname already taken
pub async fn change_nickname(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ChangeNicknameRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    state.auth.change_nickname(user.id, &req.nickname).await?;

    Ok(Json(MessageResponse {
        message: "Nickname updated".to_string(),
    }))
}

/// Change the current user's password
///
/// Verifies the old password first, then re-hashes and revokes every
/// session, so all devices must log in again.
///
/// # Errors
///
/// - `401 AUTH/UNAUTHORIZED`: old password does not match
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    prepstack_shared::auth::password::validate_password_strength(&req.new_password).map_err(
        |e| {
            crate::error::ApiError::ValidationError(vec![crate::error::ValidationErrorDetail {
                field: "newPassword".to_string(),
                message: e,
            }])
        },
    )?;

    state
        .auth
        .change_password(user.id, &req.old_password, &req.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

/// Profile image update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageRequest {
    /// Public URL of the uploaded object
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: String,
}

/// Set the current user's profile image
///
/// Clients upload via `POST /api/uploads/presign` first, then record the
/// resulting public URL here.
pub async fn change_profile_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileImageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    prepstack_shared::models::user::User::update_profile_image(&state.db, user.id, &req.image_url)
        .await?;

    Ok(Json(MessageResponse {
        message: "Profile image updated".to_string(),
    }))
}

/// Change the current user's job position
pub async fn change_position(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ChangePositionRequest>,
) -> ApiResult<Json<MessageResponse>> {
    prepstack_shared::models::user::User::update_position(&state.db, user.id, req.position_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Position updated".to_string(),
    }))
}
