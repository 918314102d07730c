/// Trending content queries
///
/// Trending is favorites received over a fixed trailing 7-day window,
/// counted from the `favorites` table grouped by target and joined back to
/// the entity rows. Nothing is persisted; every call recomputes over live
/// data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Trailing window length for trending computations
const WINDOW_DAYS: i32 = 7;

/// Default number of entities returned
pub const DEFAULT_LIMIT: i64 = 10;

/// A question ranked by recent favorites
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuestion {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_weekly: bool,
    pub view_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,

    /// Favorites received inside the trailing window
    pub recent_favorites: i64,
}

/// A post ranked by recent favorites
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrendingPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,

    /// Favorites received inside the trailing window
    pub recent_favorites: i64,
}

/// Top questions by favorites over the trailing week
pub async fn trending_questions(
    pool: &PgPool,
    category_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<TrendingQuestion>, sqlx::Error> {
    sqlx::query_as::<_, TrendingQuestion>(
        r#"
        SELECT q.id, q.title, q.content, q.is_weekly, q.view_count,
               q.favorite_count, q.created_at,
               COUNT(f.id)::BIGINT AS recent_favorites
        FROM favorites f
        JOIN questions q ON q.id = f.target_id
        WHERE f.target_kind = 'question'
          AND f.created_at >= NOW() - ($1 * INTERVAL '1 day')
          AND ($2::uuid IS NULL OR EXISTS (
                  SELECT 1 FROM question_categories qc
                  WHERE qc.question_id = q.id AND qc.category_id = $2))
        GROUP BY q.id, q.title, q.content, q.is_weekly, q.view_count,
                 q.favorite_count, q.created_at
        ORDER BY recent_favorites DESC, q.id
        LIMIT $3
        "#,
    )
    .bind(WINDOW_DAYS)
    .bind(category_id)
    .bind(limit.clamp(1, 100))
    .fetch_all(pool)
    .await
}

/// Top posts by favorites over the trailing week
pub async fn trending_posts(
    pool: &PgPool,
    category_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<TrendingPost>, sqlx::Error> {
    sqlx::query_as::<_, TrendingPost>(
        r#"
        SELECT p.id, p.user_id, p.category_id, p.title, p.content,
               p.view_count, p.favorite_count, p.created_at,
               COUNT(f.id)::BIGINT AS recent_favorites
        FROM favorites f
        JOIN posts p ON p.id = f.target_id
        WHERE f.target_kind = 'post'
          AND f.created_at >= NOW() - ($1 * INTERVAL '1 day')
          AND ($2::uuid IS NULL OR p.category_id = $2)
        GROUP BY p.id, p.user_id, p.category_id, p.title, p.content,
                 p.view_count, p.favorite_count, p.created_at
        ORDER BY recent_favorites DESC, p.id
        LIMIT $3
        "#,
    )
    .bind(WINDOW_DAYS)
    .bind(category_id)
    .bind(limit.clamp(1, 100))
    .fetch_all(pool)
    .await
}
