/// Answer model and database operations
///
/// Answers belong to a user and a question. The `is_public` flag lets users
/// keep drafts private; public listings filter on it. Answers hard-delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::Pagination;

/// A user's answer to an interview question
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub is_public: bool,
    pub view_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an answer
#[derive(Debug, Clone)]
pub struct CreateAnswer {
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub is_public: bool,
}

impl Answer {
    pub async fn create(pool: &PgPool, data: CreateAnswer) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (user_id, question_id, content, is_public)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, question_id, content, is_public,
                      view_count, favorite_count, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.question_id)
        .bind(&data.content)
        .bind(data.is_public)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, user_id, question_id, content, is_public,
                   view_count, favorite_count, created_at, updated_at
            FROM answers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Fetches an answer while incrementing its view counter
    pub async fn bump_view(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            UPDATE answers
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING id, user_id, question_id, content, is_public,
                      view_count, favorite_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists public answers for a question, newest first
    pub async fn list_public_by_question(
        pool: &PgPool,
        question_id: Uuid,
        page: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, user_id, question_id, content, is_public,
                   view_count, favorite_count, created_at, updated_at
            FROM answers
            WHERE question_id = $1 AND is_public = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(question_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Updates content and visibility, returning the updated row
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        content: &str,
        is_public: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Answer>(
            r#"
            UPDATE answers
            SET content = $2, is_public = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, question_id, content, is_public,
                      view_count, favorite_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(is_public)
        .fetch_optional(pool)
        .await
    }

    /// Hard-deletes an answer
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Owner lookup for the ownership check
    pub async fn owner_of(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM answers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}
