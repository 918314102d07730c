/// Content report model and database operations
///
/// Reports flag content for moderation. Status moves from `pending` to
/// `resolved` or `rejected`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::favorite::TargetKind;
use super::Pagination;

/// Moderation status of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "resolved" => Some(ReportStatus::Resolved),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }
}

/// A user-filed content report
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_id: Uuid,

    /// "question", "answer", "post", or "comment"
    pub target_kind: String,

    pub reason: String,

    /// "pending", "resolved", or "rejected"
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for filing a report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub reporter_id: Uuid,
    pub target_id: Uuid,
    pub target_kind: TargetKind,
    pub reason: String,
}

impl Report {
    pub async fn create(pool: &PgPool, data: CreateReport) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (reporter_id, target_id, target_kind, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING id, reporter_id, target_id, target_kind, reason, status,
                      created_at, updated_at
            "#,
        )
        .bind(data.reporter_id)
        .bind(data.target_id)
        .bind(data.target_kind.as_str())
        .bind(&data.reason)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT id, reporter_id, target_id, target_kind, reason, status,
                   created_at, updated_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists reports, newest first, optionally filtered by status
    pub async fn list(
        pool: &PgPool,
        status: Option<ReportStatus>,
        page: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT id, reporter_id, target_id, target_kind, reason, status,
                   created_at, updated_at
            FROM reports
            WHERE ($1::varchar IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await
    }

    /// Moves a report to a new status, returning the updated row
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, reporter_id, target_id, target_kind, reason, status,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_status_roundtrip() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Resolved,
            ReportStatus::Rejected,
        ] {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReportStatus::parse("open"), None);
    }
}
