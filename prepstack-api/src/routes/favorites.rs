/// Favorite endpoints
///
/// # Endpoints
///
/// - `GET    /api/favorites?targetKind=` - Current user's favorites
/// - `POST   /api/favorites/:targetId` - Favorite a target (authenticated)
/// - `DELETE /api/favorites/:targetId?targetKind=` - Remove a favorite
///
/// A favorite is unique per (user, target); the second attempt fails with
/// `409 DUPLICATE/FAVORITE`. Removing a favorite that does not exist is a
/// 404.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::models::favorite::{Favorite, TargetKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Favorite creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    /// "question", "answer", "post", or "comment"
    pub target_kind: String,
}

/// Target-kind query parameter (listing and removal)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetKindQuery {
    /// "question", "answer", "post", or "comment"
    pub target_kind: String,
}

/// Removal acknowledgement
#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

fn parse_kind(s: &str) -> ApiResult<TargetKind> {
    TargetKind::parse(s).ok_or_else(|| {
        ApiError::BadRequest(
            "targetKind must be \"question\", \"answer\", \"post\", or \"comment\"".to_string(),
        )
    })
}

/// Current user's favorites of one kind, newest first
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TargetKindQuery>,
) -> ApiResult<Json<Vec<Favorite>>> {
    let kind = parse_kind(&query.target_kind)?;

    let favorites = Favorite::list_for_user(&state.db, user.id, kind).await?;

    Ok(Json(favorites))
}

/// Favorite a target
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: target does not exist
/// - `409 DUPLICATE/FAVORITE`: already favorited
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
    Json(req): Json<AddFavoriteRequest>,
) -> ApiResult<(StatusCode, Json<Favorite>)> {
    let kind = parse_kind(&req.target_kind)?;

    let favorite = Favorite::add(&state.db, user.id, target_id, kind).await?;

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Remove a favorite
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: no favorite for this (user, target)
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
    Query(query): Query<TargetKindQuery>,
) -> ApiResult<Json<RemovedResponse>> {
    let kind = parse_kind(&query.target_kind)?;

    let removed = Favorite::remove(&state.db, user.id, target_id, kind).await?;
    if !removed {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    Ok(Json(RemovedResponse { removed }))
}
