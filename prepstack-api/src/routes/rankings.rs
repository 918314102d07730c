/// Leaderboard endpoints
///
/// All routes require authentication.
///
/// # Endpoints
///
/// - `GET /api/rankings/likes?limit=&from=&to=` - By favorites received
/// - `GET /api/rankings/answers` - By answer count
/// - `GET /api/rankings/score` - By composite score (likes + answers)
/// - `GET /api/rankings/me` - Current user's dense rank by composite score

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::models::ranking::{self, RankMetric, RankingQuery, RankingRow, UserRank};
use serde::Deserialize;

/// Leaderboard query parameters
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Result size, default 100
    pub limit: Option<i64>,

    /// Range start (inclusive) on content creation time
    pub from: Option<DateTime<Utc>>,

    /// Range end (inclusive) on content creation time
    pub to: Option<DateTime<Utc>>,
}

async fn leaderboard(
    state: &AppState,
    metric: RankMetric,
    query: LeaderboardQuery,
) -> ApiResult<Json<Vec<RankingRow>>> {
    let rows = ranking::leaderboard(
        &state.db,
        RankingQuery {
            metric,
            limit: query.limit.unwrap_or(RankingQuery::DEFAULT_LIMIT),
            from: query.from,
            to: query.to,
        },
    )
    .await?;

    Ok(Json(rows))
}

/// Leaderboard by total favorites received
pub async fn by_likes(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<RankingRow>>> {
    leaderboard(&state, RankMetric::Likes, query).await
}

/// Leaderboard by answer count
pub async fn by_answers(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<RankingRow>>> {
    leaderboard(&state, RankMetric::Answers, query).await
}

/// Leaderboard by composite score
pub async fn by_score(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<RankingRow>>> {
    leaderboard(&state, RankMetric::Score, query).await
}

/// Current user's dense rank over the composite score
///
/// Zero-activity users still resolve (score 0, last rank); only a vanished
/// user row is a 404.
pub async fn my_rank(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<UserRank>> {
    let rank = ranking::rank_of(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(rank))
}
