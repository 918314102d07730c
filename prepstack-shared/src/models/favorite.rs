/// Favorite model and database operations
///
/// A favorite is unique per (user, target id, target kind). The
/// `favorites_user_target_key` constraint is the concurrency guard, and a
/// duplicate insert surfaces as a constraint violation that the API layer
/// maps to `DUPLICATE/FAVORITE`. Adding or removing a favorite adjusts the
/// target's denormalized `favorite_count` in the same transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// What a favorite (or a report) can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Question,
    Answer,
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Question => "question",
            TargetKind::Answer => "answer",
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "question" => Some(TargetKind::Question),
            "answer" => Some(TargetKind::Answer),
            "post" => Some(TargetKind::Post),
            "comment" => Some(TargetKind::Comment),
            _ => None,
        }
    }

    /// Table holding the denormalized favorite counter for this kind
    fn counter_table(&self) -> &'static str {
        match self {
            TargetKind::Question => "questions",
            TargetKind::Answer => "answers",
            TargetKind::Post => "posts",
            TargetKind::Comment => "comments",
        }
    }
}

/// A user's favorite on a piece of content
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_id: Uuid,

    /// "question", "answer", "post", or "comment"
    pub target_kind: String,

    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Adds a favorite and bumps the target's counter atomically
    ///
    /// # Errors
    ///
    /// - `sqlx::Error::RowNotFound` when the target does not exist (the
    ///   counter update matched no row; the insert is rolled back)
    /// - the unique-constraint violation when the favorite already exists
    pub async fn add(
        pool: &PgPool,
        user_id: Uuid,
        target_id: Uuid,
        kind: TargetKind,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let bump = format!(
            "UPDATE {} SET favorite_count = favorite_count + 1 WHERE id = $1",
            kind.counter_table()
        );
        let updated = sqlx::query(&bump).bind(target_id).execute(&mut *tx).await?;
        if updated.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        let favorite = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, target_id, target_kind)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, target_id, target_kind, created_at
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .bind(kind.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(favorite)
    }

    /// Removes a favorite and decrements the target's counter atomically
    ///
    /// Returns false when no favorite existed for the tuple.
    pub async fn remove(
        pool: &PgPool,
        user_id: Uuid,
        target_id: Uuid,
        kind: TargetKind,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND target_id = $2 AND target_kind = $3",
        )
        .bind(user_id)
        .bind(target_id)
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        let drop = format!(
            "UPDATE {} SET favorite_count = GREATEST(favorite_count - 1, 0) WHERE id = $1",
            kind.counter_table()
        );
        sqlx::query(&drop).bind(target_id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Lists a user's favorites of one kind, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        kind: TargetKind,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, target_id, target_kind, created_at
            FROM favorites
            WHERE user_id = $1 AND target_kind = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_kind_roundtrip() {
        for kind in [
            TargetKind::Question,
            TargetKind::Answer,
            TargetKind::Post,
            TargetKind::Comment,
        ] {
            assert_eq!(TargetKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TargetKind::parse("user"), None);
    }

    #[test]
    fn test_counter_table_mapping() {
        assert_eq!(TargetKind::Question.counter_table(), "questions");
        assert_eq!(TargetKind::Comment.counter_table(), "comments");
    }
}
