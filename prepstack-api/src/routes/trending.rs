/// Trending content endpoints
///
/// # Endpoints
///
/// - `GET /api/trending/questions?categoryId=&limit=`
/// - `GET /api/trending/posts?categoryId=&limit=`
///
/// Trending scores are favorites received in the trailing 7 days; nothing is
/// persisted and every call recomputes.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use prepstack_shared::models::trending::{self, TrendingPost, TrendingQuestion};
use serde::Deserialize;
use uuid::Uuid;

/// Trending query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    pub category_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// Top questions over the trailing week
pub async fn questions(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<Json<Vec<TrendingQuestion>>> {
    let rows = trending::trending_questions(
        &state.db,
        query.category_id,
        query.limit.unwrap_or(trending::DEFAULT_LIMIT),
    )
    .await?;

    Ok(Json(rows))
}

/// Top posts over the trailing week
pub async fn posts(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> ApiResult<Json<Vec<TrendingPost>>> {
    let rows = trending::trending_posts(
        &state.db,
        query.category_id,
        query.limit.unwrap_or(trending::DEFAULT_LIMIT),
    )
    .await?;

    Ok(Json(rows))
}
