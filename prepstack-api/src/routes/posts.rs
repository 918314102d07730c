/// Community post endpoints
///
/// # Endpoints
///
/// - `GET    /api/posts?categoryId=` - Browse posts
/// - `GET    /api/posts/:id` - Post detail; bumps the view counter
/// - `POST   /api/posts` - Create a post (authenticated)
/// - `PATCH  /api/posts/:id` - Edit own post
/// - `DELETE /api/posts/:id` - Hard-delete own post

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::ownership,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::models::category::Category;
use prepstack_shared::models::post::{CreatePost, Post};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Post browsing query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Post creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    pub category_id: Uuid,
}

/// Post update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    pub category_id: Uuid,
}

/// Deletion acknowledgement
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Browse posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<Vec<Post>>> {
    let posts = Post::list(
        &state.db,
        query.category_id,
        super::pagination(query.limit, query.page),
    )
    .await?;

    Ok(Json(posts))
}

/// Post detail
///
/// Each read increments the view counter.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Post>> {
    let post = Post::bump_view(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Create a post
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: unknown category
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    req.validate()?;

    if Category::find_by_id(&state.db, req.category_id).await?.is_none() {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    let post = Post::create(
        &state.db,
        CreatePost {
            user_id: user.id,
            category_id: req.category_id,
            title: req.title,
            content: req.content,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Edit own post
pub async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    req.validate()?;
    ownership::ensure_post_owner(&state.db, id, user.id).await?;

    if Category::find_by_id(&state.db, req.category_id).await?.is_none() {
        return Err(ApiError::NotFound("Category not found".to_string()));
    }

    let post = Post::update(&state.db, id, &req.title, &req.content, req.category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Hard-delete own post
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    ownership::ensure_post_owner(&state.db, id, user.id).await?;

    let deleted = Post::delete(&state.db, id).await?;

    Ok(Json(DeletedResponse { deleted }))
}
