//! Preventive recommendations derived from the caller's analysis history.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::endpoints::generate_blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db;
use crate::pipeline::normalizer::{self, prompt, RecommendationSet};

#[derive(Deserialize)]
pub struct RecommendationQuery {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub status: &'static str,
    pub recommendations: RecommendationSet,
}

/// `GET /api/recommendations[?email=]`. The optional `email` must be the
/// caller's own.
pub async fn recommend(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    if let Some(requested) = query.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        if !requested.eq_ignore_ascii_case(&user.email) {
            return Err(ApiError::Forbidden(
                "Recommendations are only available for your own history".into(),
            ));
        }
    }

    let history = ctx
        .core
        .with_db(|conn| db::get_findings_by_owner(conn, &user.email))?;
    if history.is_empty() {
        return Err(ApiError::NotFound("No past analyses found".into()));
    }

    let history_json = serde_json::to_string(&history)
        .map_err(|e| ApiError::Internal(format!("history serialization: {e}")))?;
    tracing::debug!(user = %user.email, analyses = history.len(), "Requesting recommendations");

    let raw = generate_blocking(
        ctx.core.llm(),
        prompt::build_recommendation_prompt(&history_json),
        None,
        "Failed to generate recommendations",
    )
    .await?;

    Ok(Json(RecommendationResponse {
        status: "success",
        recommendations: normalizer::normalize_recommendations(&raw),
    }))
}
