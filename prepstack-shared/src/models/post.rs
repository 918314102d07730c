/// Community post model and database operations
///
/// Posts are user-authored content in a single category, with view and
/// favorite counters. Posts hard-delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::Pagination;

/// Community post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
}

impl Post {
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, category_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, category_id, title, content,
                      view_count, favorite_count, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.content)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, category_id, title, content,
                   view_count, favorite_count, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Fetches a post while incrementing its view counter
    pub async fn bump_view(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING id, user_id, category_id, title, content,
                      view_count, favorite_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists posts, newest first, optionally filtered by category
    pub async fn list(
        pool: &PgPool,
        category_id: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, category_id, title, content,
                   view_count, favorite_count, created_at, updated_at
            FROM posts
            WHERE ($1::uuid IS NULL OR category_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Updates title, content, and category, returning the updated row
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        title: &str,
        content: &str,
        category_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, content = $3, category_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, category_id, title, content,
                      view_count, favorite_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(category_id)
        .fetch_optional(pool)
        .await
    }

    /// Hard-deletes a post
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Owner lookup for the ownership check
    pub async fn owner_of(pool: &PgPool, id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let row: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|(user_id,)| user_id))
    }
}
