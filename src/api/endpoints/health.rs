//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub model_configured: bool,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let llm = ctx.core.llm();
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model: llm.model_name().to_string(),
        model_configured: llm.is_configured(),
    })
}
