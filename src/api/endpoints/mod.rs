//! API endpoint handlers, one module per resource.

pub mod analyses;
pub mod analyze;
pub mod appointments;
pub mod contact;
pub mod diagnose;
pub mod doctors;
pub mod health;
pub mod recommendations;
pub mod users;

use std::sync::Arc;

use crate::api::error::ApiError;
use crate::pipeline::llm::{InlineImage, LlmClient};

/// Run a blocking model call off the async runtime. Model failures are
/// reported under `failure`.
pub(crate) async fn generate_blocking(
    llm: Arc<dyn LlmClient>,
    prompt: String,
    image: Option<InlineImage>,
    failure: &'static str,
) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || llm.generate(&prompt, image.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("model task failed: {e}")))?
        .map_err(|e| ApiError::upstream(failure, e))
}

/// Map an axum body rejection onto a 400 with the rejection's message.
pub(crate) fn bad_body(rejection: impl std::fmt::Display) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {rejection}"))
}
