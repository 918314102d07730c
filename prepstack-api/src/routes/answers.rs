/// Answer endpoints
///
/// # Endpoints
///
/// - `POST   /api/answers/:questionId` - Answer a question (authenticated)
/// - `GET    /api/answers/question/:questionId` - Public answers for a question
/// - `GET    /api/answers/:id` - Answer detail; bumps the view counter
/// - `PATCH  /api/answers/:id` - Edit own answer
/// - `DELETE /api/answers/:id` - Hard-delete own answer

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
use prepstack_shared::models::answer::{Answer, CreateAnswer};
use prepstack_shared::models::question::Question;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Answer creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Defaults to public
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

/// Answer update request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    #[serde(default = "default_public")]
    pub is_public: bool,
}

/// Pagination query
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Deletion acknowledgement
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Answer a question
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: no such question
pub async fn create_answer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(question_id): Path<Uuid>,
    Json(req): Json<CreateAnswerRequest>,
) -> ApiResult<(StatusCode, Json<Answer>)> {
    req.validate()?;

    if Question::find_by_id(&state.db, question_id).await?.is_none() {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    let answer = Answer::create(
        &state.db,
        CreateAnswer {
            user_id: user.id,
            question_id,
            content: req.content,
            is_public: req.is_public,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(answer)))
}

/// Public answers for a question, paginated
pub async fn list_by_question(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Vec<Answer>>> {
    let answers = Answer::list_public_by_question(
        &state.db,
        question_id,
        super::pagination(query.limit, query.page),
    )
    .await?;

    Ok(Json(answers))
}

/// Answer detail
///
/// Each read increments the view counter.
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Answer>> {
    let answer = Answer::bump_view(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

    Ok(Json(answer))
}

/// Edit own answer
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: no such answer
/// - `403 AUTH/FORBIDDEN`: not the owner
pub async fn update_answer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAnswerRequest>,
) -> ApiResult<Json<Answer>> {
    req.validate()?;
    ownership::ensure_answer_owner(&state.db, id, user.id).await?;

    let answer = Answer::update(&state.db, id, &req.content, req.is_public)
        .await?
        .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

    Ok(Json(answer))
}

/// Hard-delete own answer
pub async fn delete_answer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletedResponse>> {
    ownership::ensure_answer_owner(&state.db, id, user.id).await?;

    let deleted = Answer::delete(&state.db, id).await?;

    Ok(Json(DeletedResponse { deleted }))
}
