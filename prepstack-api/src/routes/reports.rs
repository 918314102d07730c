/// Content report endpoints
///
/// All routes require authentication.
///
/// # Endpoints
///
/// - `POST  /api/reports` - File a report
/// - `GET   /api/reports?status=` - List reports
/// - `PATCH /api/reports/:id` - Move a report to resolved/rejected

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use prepstack_shared::auth::tokens::AuthUser;
use prepstack_shared::models::favorite::TargetKind;
use prepstack_shared::models::report::{CreateReport, Report, ReportStatus};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Report creation request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    /// "question", "answer", "post", or "comment"
    pub target_kind: String,

    pub target_id: Uuid,

    #[validate(length(min = 1, max = 1000, message = "Reason must be 1-1000 characters"))]
    pub reason: String,
}

/// Report listing query
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    /// "pending", "resolved", or "rejected"
    pub status: Option<String>,

    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Report status update request
#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    /// "pending", "resolved", or "rejected"
    pub status: String,
}

/// File a report
pub async fn create_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<Report>)> {
    req.validate()?;

    let kind = TargetKind::parse(&req.target_kind).ok_or_else(|| {
        ApiError::BadRequest(
            "targetKind must be \"question\", \"answer\", \"post\", or \"comment\"".to_string(),
        )
    })?;

    let report = Report::create(
        &state.db,
        CreateReport {
            reporter_id: user.id,
            target_id: req.target_id,
            target_kind: kind,
            reason: req.reason,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// List reports, optionally filtered by status
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> ApiResult<Json<Vec<Report>>> {
    let status = match &query.status {
        Some(s) => Some(ReportStatus::parse(s).ok_or_else(|| {
            ApiError::BadRequest(
                "status must be \"pending\", \"resolved\", or \"rejected\"".to_string(),
            )
        })?),
        None => None,
    };

    let reports = Report::list(
        &state.db,
        status,
        super::pagination(query.limit, query.page),
    )
    .await?;

    Ok(Json(reports))
}

/// Move a report to a new status
pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReportRequest>,
) -> ApiResult<Json<Report>> {
    let status = ReportStatus::parse(&req.status).ok_or_else(|| {
        ApiError::BadRequest(
            "status must be \"pending\", \"resolved\", or \"rejected\"".to_string(),
        )
    })?;

    let report = Report::update_status(&state.db, id, status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Report not found".to_string()))?;

    Ok(Json(report))
}
