/// Interview question model and database operations
///
/// Questions are centrally curated content users answer. They carry view and
/// favorite counters and associate with categories through the
/// `question_categories` join table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::category::Category;
use super::Pagination;

/// Interview question
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub content: String,

    /// Featured in the weekly rotation
    pub is_weekly: bool,

    pub view_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a question
#[derive(Debug, Clone)]
pub struct CreateQuestion {
    pub title: String,
    pub content: String,
    pub is_weekly: bool,
    pub category_ids: Vec<Uuid>,
}

/// List filters for question browsing
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionFilter {
    pub category_id: Option<Uuid>,
    pub weekly: Option<bool>,
}

impl Question {
    /// Creates a question and its category associations in one transaction
    pub async fn create(pool: &PgPool, data: CreateQuestion) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (title, content, is_weekly)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, is_weekly, view_count, favorite_count,
                      created_at, updated_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.is_weekly)
        .fetch_one(&mut *tx)
        .await?;

        for category_id in &data.category_ids {
            sqlx::query(
                "INSERT INTO question_categories (question_id, category_id) VALUES ($1, $2)",
            )
            .bind(question.id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(question)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, title, content, is_weekly, view_count, favorite_count,
                   created_at, updated_at
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Fetches a question while incrementing its view counter
    ///
    /// Returns the row after the bump so the response reflects the read.
    pub async fn bump_view(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING id, title, content, is_weekly, view_count, favorite_count,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists questions, newest first, with optional category/weekly filters
    pub async fn list(
        pool: &PgPool,
        filter: QuestionFilter,
        page: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT q.id, q.title, q.content, q.is_weekly, q.view_count,
                   q.favorite_count, q.created_at, q.updated_at
            FROM questions q
            WHERE ($1::uuid IS NULL OR EXISTS (
                      SELECT 1 FROM question_categories qc
                      WHERE qc.question_id = q.id AND qc.category_id = $1))
              AND ($2::boolean IS NULL OR q.is_weekly = $2)
            ORDER BY q.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.category_id)
        .bind(filter.weekly)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Categories associated with a question
    pub async fn categories(pool: &PgPool, id: Uuid) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.created_at
            FROM categories c
            JOIN question_categories qc ON qc.category_id = c.id
            WHERE qc.question_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_filter_default() {
        let filter = QuestionFilter::default();
        assert!(filter.category_id.is_none());
        assert!(filter.weekly.is_none());
    }
}
