/// Leaderboard aggregation queries
///
/// The leaderboard rolls up three grouped sub-aggregates per user (answer
/// favorites + answer count, post favorites, comment favorites with
/// soft-deleted comments excluded), left-joined from `users` so users with no content
/// still appear with a zero score. The composite score is total favorites
/// received plus answer count.
///
/// The optional date range filters each sub-aggregate on the content row's
/// `created_at`; the NULL-bind pattern keeps the SQL static. Single-user
/// lookup runs the same rollup under a `DENSE_RANK() OVER (ORDER BY score
/// DESC)` window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Which metric a leaderboard is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMetric {
    /// Total favorites received across answers, posts, and comments
    Likes,

    /// Total answers written
    Answers,

    /// Composite: total favorites + answer count
    Score,
}

impl RankMetric {
    /// Rollup column backing this metric (static, safe to interpolate)
    fn order_column(&self) -> &'static str {
        match self {
            RankMetric::Likes => "total_likes",
            RankMetric::Answers => "answer_count",
            RankMetric::Score => "score",
        }
    }
}

/// Leaderboard query parameters
#[derive(Debug, Clone, Copy)]
pub struct RankingQuery {
    pub metric: RankMetric,
    pub limit: i64,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl RankingQuery {
    pub const DEFAULT_LIMIT: i64 = 100;

    pub fn new(metric: RankMetric) -> Self {
        Self {
            metric,
            limit: Self::DEFAULT_LIMIT,
            from: None,
            to: None,
        }
    }
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub user_id: Uuid,
    pub nickname: String,
    pub profile_image_url: Option<String>,
    pub level: i32,
    pub total_likes: i64,
    pub answer_count: i64,
    pub score: i64,
}

/// A single user's position under dense ranking by composite score
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRank {
    pub user_id: Uuid,
    pub nickname: String,
    pub total_likes: i64,
    pub answer_count: i64,
    pub score: i64,
    pub rank: i64,
}

/// Shared CTE rollup; $1 and $2 are the optional date range
const ROLLUP_CTE: &str = r#"
    WITH answer_stats AS (
        SELECT user_id,
               COALESCE(SUM(favorite_count), 0)::BIGINT AS likes,
               COUNT(*)::BIGINT AS answers
        FROM answers
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        GROUP BY user_id
    ),
    post_stats AS (
        SELECT user_id,
               COALESCE(SUM(favorite_count), 0)::BIGINT AS likes
        FROM posts
        WHERE ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        GROUP BY user_id
    ),
    comment_stats AS (
        SELECT user_id,
               COALESCE(SUM(favorite_count), 0)::BIGINT AS likes
        FROM comments
        WHERE is_deleted = FALSE
          AND ($1::timestamptz IS NULL OR created_at >= $1)
          AND ($2::timestamptz IS NULL OR created_at <= $2)
        GROUP BY user_id
    ),
    rollup AS (
        SELECT u.id AS user_id,
               u.nickname,
               u.profile_image_url,
               u.level,
               COALESCE(a.likes, 0) + COALESCE(p.likes, 0) + COALESCE(c.likes, 0) AS total_likes,
               COALESCE(a.answers, 0) AS answer_count,
               COALESCE(a.likes, 0) + COALESCE(p.likes, 0) + COALESCE(c.likes, 0)
                   + COALESCE(a.answers, 0) AS score
        FROM users u
        LEFT JOIN answer_stats a ON a.user_id = u.id
        LEFT JOIN post_stats p ON p.user_id = u.id
        LEFT JOIN comment_stats c ON c.user_id = u.id
    )
"#;

/// Computes a leaderboard ordered by the chosen metric, descending
///
/// Ties break on user id so pagination is stable.
pub async fn leaderboard(pool: &PgPool, query: RankingQuery) -> Result<Vec<RankingRow>, sqlx::Error> {
    let sql = format!(
        r#"{ROLLUP_CTE}
        SELECT user_id, nickname, profile_image_url, level,
               total_likes, answer_count, score
        FROM rollup
        ORDER BY {} DESC, user_id
        LIMIT $3
        "#,
        query.metric.order_column()
    );

    sqlx::query_as::<_, RankingRow>(&sql)
        .bind(query.from)
        .bind(query.to)
        .bind(query.limit.clamp(1, 1000))
        .fetch_all(pool)
        .await
}

/// Looks up one user's dense rank over the composite score
///
/// Every user resolves to a rank; zero-activity users rank last with a
/// score of 0 rather than erroring. Returns None only when the user row
/// itself is gone.
pub async fn rank_of(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRank>, sqlx::Error> {
    let sql = format!(
        r#"{ROLLUP_CTE},
        ranked AS (
            SELECT user_id, nickname, total_likes, answer_count, score,
                   DENSE_RANK() OVER (ORDER BY score DESC) AS rank
            FROM rollup
        )
        SELECT user_id, nickname, total_likes, answer_count, score, rank
        FROM ranked
        WHERE user_id = $3
        "#
    );

    sqlx::query_as::<_, UserRank>(&sql)
        .bind(None::<DateTime<Utc>>)
        .bind(None::<DateTime<Utc>>)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_order_columns() {
        assert_eq!(RankMetric::Likes.order_column(), "total_likes");
        assert_eq!(RankMetric::Answers.order_column(), "answer_count");
        assert_eq!(RankMetric::Score.order_column(), "score");
    }

    #[test]
    fn test_ranking_query_defaults() {
        let query = RankingQuery::new(RankMetric::Score);
        assert_eq!(query.limit, 100);
        assert!(query.from.is_none());
        assert!(query.to.is_none());
    }
}
