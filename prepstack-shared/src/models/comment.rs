/// Comment model and database operations
///
/// Comments attach to a post or an answer (`target_kind`) and may reply to a
/// parent comment. Comments soft-delete: the row stays so replies remain
/// addressable, and responses mask the content and author of deleted rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::Pagination;

/// What a comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTarget {
    Post,
    Answer,
}

impl CommentTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentTarget::Post => "post",
            CommentTarget::Answer => "answer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(CommentTarget::Post),
            "answer" => Some(CommentTarget::Answer),
            _ => None,
        }
    }
}

/// Comment on a post or answer
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target_id: Uuid,

    /// "post" or "answer"
    pub target_kind: String,

    pub content: String,

    /// Parent comment for replies
    pub parent_id: Option<Uuid>,

    /// Soft-delete marker; deleted rows stay for thread integrity
    pub is_deleted: bool,

    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub user_id: Uuid,
    pub target_id: Uuid,
    pub target_kind: CommentTarget,
    pub content: String,
    pub parent_id: Option<Uuid>,
}

impl Comment {
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, target_id, target_kind, content, parent_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, target_id, target_kind, content, parent_id,
                      is_deleted, favorite_count, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.target_id)
        .bind(data.target_kind.as_str())
        .bind(&data.content)
        .bind(data.parent_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, target_id, target_kind, content, parent_id,
                   is_deleted, favorite_count, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a target's comment thread, oldest first
    ///
    /// Soft-deleted rows are included so replies keep their anchor; the
    /// response layer masks their content and author.
    pub async fn list_for_target(
        pool: &PgPool,
        target_id: Uuid,
        target_kind: CommentTarget,
        page: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, target_id, target_kind, content, parent_id,
                   is_deleted, favorite_count, created_at, updated_at
            FROM comments
            WHERE target_id = $1 AND target_kind = $2
            ORDER BY created_at ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(target_id)
        .bind(target_kind.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Updates content, refusing to touch soft-deleted rows
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        content: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, user_id, target_id, target_kind, content, parent_id,
                      is_deleted, favorite_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(pool)
        .await
    }

    /// Soft-deletes a comment; the row and its children remain addressable
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Owner lookup for the ownership check
    pub async fn owner_of(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_target_roundtrip() {
        assert_eq!(CommentTarget::parse("post"), Some(CommentTarget::Post));
        assert_eq!(CommentTarget::parse("answer"), Some(CommentTarget::Answer));
        assert_eq!(CommentTarget::parse("question"), None);
        assert_eq!(CommentTarget::Post.as_str(), "post");
    }
}
