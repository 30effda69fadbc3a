//! Generative-model access. One attempt per call; failures are returned
//! as-is and never retried.

pub mod gemini;

pub use gemini::*;

use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Model API key is not configured")]
    NotConfigured,

    #[error("Cannot reach model endpoint at {0}")]
    Connection(String),

    #[error("Model request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model API returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Model blocked the request: {0}")]
    Blocked(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Base64 image sent alongside the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data_base64: String,
}

/// Text-generation client abstraction (allows mocking).
pub trait LlmClient: Send + Sync {
    /// Single completion for `prompt`, optionally grounded on an image.
    fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;

    /// Whether the client has credentials to make calls at all.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Mock client for tests. Returns a configurable response and records the
/// prompts it was given.
pub struct MockLlmClient {
    response: Result<String, String>,
    prompts: Mutex<Vec<(String, Option<InlineImage>)>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an HTTP client error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_calls(&self) -> Vec<(String, Option<InlineImage>)> {
        self.prompts
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.prompts.lock() {
            calls.push((prompt.to_string(), image.cloned()));
        }
        self.response
            .clone()
            .map_err(LlmError::HttpClient)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
