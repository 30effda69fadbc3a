//! Symptom diagnosis endpoint. Results are returned, never stored.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::{bad_body, generate_blocking};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::normalizer::{self, prompt, DiagnosisRecord};

/// Longest symptom description forwarded to the model.
const MAX_SYMPTOMS_CHARS: usize = 4000;

#[derive(Deserialize)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub symptoms: String,
}

#[derive(Serialize)]
pub struct DiagnoseResponse {
    pub status: &'static str,
    pub diagnosis: DiagnosisRecord,
}

/// `POST /api/diagnose`
pub async fn diagnose(
    State(ctx): State<ApiContext>,
    payload: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    let symptoms = request.symptoms.trim();
    if symptoms.is_empty() {
        return Err(ApiError::BadRequest("Symptoms are required".into()));
    }
    if symptoms.chars().count() > MAX_SYMPTOMS_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Symptoms must be at most {MAX_SYMPTOMS_CHARS} characters"
        )));
    }

    let raw = generate_blocking(
        ctx.core.llm(),
        prompt::build_diagnosis_prompt(symptoms),
        None,
        "An error occurred while generating the diagnosis.",
    )
    .await?;

    Ok(Json(DiagnoseResponse {
        status: "success",
        diagnosis: normalizer::normalize_diagnosis(&raw),
    }))
}
