/// Interview question endpoints
///
/// # Endpoints
///
/// - `GET  /api/questions` - Browse questions (category/weekly filters)
/// - `GET  /api/questions/:id` - Question detail; bumps the view counter
/// - `POST /api/questions` - Create a question (authenticated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use prepstack_shared::models::category::Category;
use prepstack_shared::models::question::{CreateQuestion, Question, QuestionFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Question browsing query
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuestionsQuery {
    pub category_id: Option<Uuid>,
    pub weekly: Option<bool>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Question creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    #[serde(default)]
    pub is_weekly: bool,

    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Question detail with its categories
#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub categories: Vec<Category>,
}

/// Browse questions
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<ListQuestionsQuery>,
) -> ApiResult<Json<Vec<Question>>> {
    let questions = Question::list(
        &state.db,
        QuestionFilter {
            category_id: query.category_id,
            weekly: query.weekly,
        },
        super::pagination(query.limit, query.page),
    )
    .await?;

    Ok(Json(questions))
}

/// Question detail
///
/// Each read increments the view counter.
///
/// # Errors
///
/// - `404 COMMON/NOT_FOUND`: no such question
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<QuestionDetail>> {
    let question = Question::bump_view(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    let categories = Question::categories(&state.db, id).await?;

    Ok(Json(QuestionDetail {
        question,
        categories,
    }))
}

/// Create a question
pub async fn create_question(
    State(state): State<AppState>,
    Json(req): Json<CreateQuestionRequest>,
) -> ApiResult<(StatusCode, Json<Question>)> {
    req.validate()?;

    let question = Question::create(
        &state.db,
        CreateQuestion {
            title: req.title,
            content: req.content,
            is_weekly: req.is_weekly,
            category_ids: req.category_ids,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(question)))
}
