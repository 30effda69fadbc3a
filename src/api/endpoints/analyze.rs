//! Image analysis endpoint.
//!
//! `POST /api/analyze` takes one multipart `file` field holding an image,
//! asks the model for findings, normalizes the reply and stores the record
//! under the caller's email.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use base64::Engine;
use serde::Serialize;

use crate::api::endpoints::generate_blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, UserContext};
use crate::db;
use crate::models::AnalysisRecord;
use crate::pipeline::llm::InlineImage;
use crate::pipeline::normalizer::{self, prompt};

/// Maximum accepted image size (8 MiB).
pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: &'static str,
    pub analysis: AnalysisRecord,
}

struct Upload {
    mime_type: String,
    bytes: Vec<u8>,
}

pub async fn analyze(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let upload = read_file_field(&mut multipart).await?;

    if !upload.mime_type.starts_with("image/") {
        tracing::warn!(mime_type = %upload.mime_type, "Rejected non-image upload");
        return Err(ApiError::BadRequest("File must be an image".into()));
    }
    if upload.bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "File too large. Maximum {}MB.",
            MAX_IMAGE_BYTES / (1024 * 1024)
        )));
    }

    let image = InlineImage {
        mime_type: upload.mime_type.clone(),
        data_base64: base64::engine::general_purpose::STANDARD.encode(&upload.bytes),
    };
    tracing::info!(
        user = %user.email,
        mime_type = %image.mime_type,
        bytes = upload.bytes.len(),
        "Analyzing image"
    );

    let raw = generate_blocking(
        ctx.core.llm(),
        prompt::build_analysis_prompt(),
        Some(image.clone()),
        "Failed to process the image",
    )
    .await?;

    let findings = normalizer::normalize_analysis(&raw);
    let record = AnalysisRecord::new(findings, image.data_base64, &image.mime_type, &user.email);
    ctx.core
        .with_db(|conn| db::insert_analysis(conn, &record))?;

    tracing::info!(id = %record.id, conditions = record.potential_conditions.len(), "Analysis stored");
    Ok(Json(AnalyzeResponse {
        status: "success",
        analysis: record,
    }))
}

/// Pull the `file` field out of the form. Other fields are ignored.
async fn read_file_field(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?;
        let Some(field) = field else {
            return Err(ApiError::BadRequest("No file provided".into()));
        };
        if field.name() != Some("file") {
            continue;
        }
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_ascii_lowercase();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?;
        return Ok(Upload {
            mime_type,
            bytes: bytes.to_vec(),
        });
    }
}
