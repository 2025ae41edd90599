use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use super::dto::*;
use super::error::ApiResult;
use super::state::AppState;
use crate::enrich::{BadgeSource, StatsSource};
use crate::models::BulkReport;
use crate::report;

/// GET / - Service banner
pub async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: Some("Student Dashboard API is running!"),
        status: "healthy",
    })
}

/// GET /health - Health check
pub async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: None,
        status: "healthy",
    })
}

/// GET /api/student/{roll} - One student with LeetCode stats and HackerRank badges
pub async fn get_student<S: StatsSource, B: BadgeSource>(
    State(state): State<Arc<AppState<S, B>>>,
    Path(roll): Path<String>,
) -> ApiResult<Json<StudentResponse>> {
    let roster = state.roster.snapshot().await?;
    let record = state.enricher.get_student(&roster, &roll).await?;
    tracing::info!(roll = %record.student.roll_number, "student enriched");

    Ok(Json(StudentResponse::from_record(
        record,
        state.enricher.settings(),
    )))
}

/// GET /api/students - Roster listing without external lookups
pub async fn list_students<S: StatsSource, B: BadgeSource>(
    State(state): State<Arc<AppState<S, B>>>,
) -> ApiResult<Json<StudentsResponse>> {
    let roster = state.roster.snapshot().await?;
    let students: Vec<StudentListing> = roster.all().iter().map(StudentListing::from).collect();
    let total = students.len();

    Ok(Json(StudentsResponse { students, total }))
}

/// GET /api/badges/bulk-download - Enriched CSV wrapped in JSON with summary stats
pub async fn bulk_download<S: StatsSource, B: BadgeSource>(
    State(state): State<Arc<AppState<S, B>>>,
) -> ApiResult<Json<BulkResponse>> {
    let (report, csv) = build_export(&state).await?;

    Ok(Json(BulkResponse {
        success: true,
        data: csv,
        stats: report.summary,
    }))
}

/// GET /api/badges/bulk-download-csv - Enriched CSV as an attachment
pub async fn bulk_download_csv<S: StatsSource, B: BadgeSource>(
    State(state): State<Arc<AppState<S, B>>>,
) -> ApiResult<impl IntoResponse> {
    let (report, csv) = build_export(&state).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report::export_filename(report.generated_at)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

async fn build_export<S: StatsSource, B: BadgeSource>(
    state: &AppState<S, B>,
) -> ApiResult<(BulkReport, String)> {
    let roster = state.roster.snapshot().await?;
    tracing::info!(students = roster.len(), "bulk export started");

    let report = state.enricher.bulk_enrich(&roster).await;
    let csv = report::render_csv(&report)?;
    Ok((report, csv))
}
