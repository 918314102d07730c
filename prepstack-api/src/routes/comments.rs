/// Comment endpoints
///
/// # Endpoints
///
/// - `GET    /api/comments/:targetId?category=post|answer` - Thread listing
/// - `POST   /api/comments/:targetId` - Comment or reply (authenticated)
/// - `PATCH  /api/comments/:commentId` - Edit own comment
/// - `DELETE /api/comments/:commentId` - Soft-delete own comment
///
/// Soft-deleted comments stay in the thread (replies keep their anchor) but
/// responses mask their content and author.

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
use chrono::{DateTime, Utc};
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::models::comment::{Comment, CommentTarget, CreateComment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Masked text shown in place of a deleted comment's content
const DELETED_PLACEHOLDER: &str = "[deleted]";

/// Thread listing query
#[derive(Debug, Deserialize)]
pub struct ListCommentsQuery {
    /// "post" or "answer"
    pub category: String,

    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Comment creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    /// "post" or "answer"
    pub category: String,

    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,

    /// Parent comment for replies
    pub parent_id: Option<Uuid>,
}

/// Comment update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Comment as returned to clients
///
/// Deleted comments keep their id and thread position but lose content and
/// author.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub user_id: Option<String>,
    pub target_id: String,
    pub target_kind: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub is_deleted: bool,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        let (user_id, content) = if comment.is_deleted {
            (None, DELETED_PLACEHOLDER.to_string())
        } else {
            (Some(comment.user_id.to_string()), comment.content)
        };

        Self {
            id: comment.id.to_string(),
            user_id,
            target_id: comment.target_id.to_string(),
            target_kind: comment.target_kind,
            content,
            parent_id: comment.parent_id.map(|id| id.to_string()),
            is_deleted: comment.is_deleted,
            favorite_count: comment.favorite_count,
            created_at: comment.created_at,
        }
    }
}

fn parse_target(category: &str) -> ApiResult<CommentTarget> {
    CommentTarget::parse(category)
        .ok_or_else(|| ApiError::BadRequest("category must be \"post\" or \"answer\"".to_string()))
}

/// Thread listing for a post or answer
pub async fn list_comments(
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let target = parse_target(&query.category)?;

    let comments = Comment::list_for_target(
        &state.db,
        target_id,
        target,
        super::pagination(query.limit, query.page),
    )
    .await?;

    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// Comment on a post or answer (or reply to a comment)
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: replying to a parent that does not exist or
///   belongs to a different thread
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    req.validate()?;
    let target = parse_target(&req.category)?;

    if let Some(parent_id) = req.parent_id {
        let parent = Comment::find_by_id(&state.db, parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Parent comment not found".to_string()))?;

        if parent.target_id != target_id {
            return Err(ApiError::BadRequest(
                "Parent comment belongs to a different thread".to_string(),
            ));
        }
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            user_id: user.id,
            target_id,
            target_kind: target,
            content: req.content,
            parent_id: req.parent_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// Edit own comment
///
/// Soft-deleted comments cannot be edited.
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    req.validate()?;
    ownership::ensure_comment_owner(&state.db, id, user.id).await?;

    let comment = Comment::update_content(&state.db, id, &req.content)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    Ok(Json(CommentResponse::from(comment)))
}

/// Soft-delete own comment
///
/// The row and its replies remain addressable; listings mask the content.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    ownership::ensure_comment_owner(&state.db, id, user.id).await?;

    Comment::soft_delete(&state.db, id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comment(is_deleted: bool) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            target_id: Uuid::new_v4(),
            target_kind: "post".to_string(),
            content: "original content".to_string(),
            parent_id: None,
            is_deleted,
            favorite_count: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_live_comment_keeps_content_and_author() {
        let response = CommentResponse::from(sample_comment(false));
        assert_eq!(response.content, "original content");
        assert!(response.user_id.is_some());
    }

    #[test]
    fn test_deleted_comment_is_masked_but_addressable() {
        let comment = sample_comment(true);
        let id = comment.id.to_string();
        let response = CommentResponse::from(comment);

        assert_eq!(response.id, id);
        assert_eq!(response.content, DELETED_PLACEHOLDER);
        assert!(response.user_id.is_none());
        assert!(response.is_deleted);
    }
}
