//! Analysis history and PDF report download.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db;
use crate::models::AnalysisRecord;
use crate::report;

#[derive(Serialize)]
pub struct AnalysesResponse {
    pub status: &'static str,
    pub analyses: Vec<AnalysisRecord>,
}

/// `GET /api/analyses`: the caller's analyses, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AnalysesResponse>, ApiError> {
    let analyses = ctx
        .core
        .with_db(|conn| db::get_analyses_by_owner(conn, &user.email))?;
    Ok(Json(AnalysesResponse {
        status: "success",
        analyses,
    }))
}

/// `GET /api/analyses/:id/report.pdf`. Another user's analysis is reported
/// as not found.
pub async fn report_pdf(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid analysis id: {id}")))?;

    let record = ctx.core.with_db(|conn| db::get_analysis(conn, &id))?;
    if !record.owner_email.eq_ignore_ascii_case(&user.email) {
        return Err(ApiError::NotFound(format!("analysis {id} not found")));
    }

    let bytes = report::generate_analysis_pdf(&record)?;
    let disposition = format!("attachment; filename=\"analysis-{id}.pdf\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
