use serde::{Deserialize, Serialize};

use super::{InlineImage, LlmClient, LlmError};
use crate::config::GeminiConfig;

/// Google Gemini `generateContent` client (blocking; call from
/// `spawn_blocking` inside async handlers).
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Response body from `generateContent`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn build_request<'a>(prompt: &'a str, image: Option<&'a InlineImage>) -> GenerateRequest<'a> {
    let mut parts = vec![Part::Text { text: prompt }];
    if let Some(img) = image {
        parts.push(Part::Inline {
            inline_data: InlineData {
                mime_type: &img.mime_type,
                data: &img.data_base64,
            },
        });
    }

    GenerateRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfig {
            temperature: 0.2,
            max_output_tokens: 4096,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, LlmError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_default();
        return match reason.as_str() {
            "SAFETY" | "RECITATION" | "BLOCKLIST" => Err(LlmError::Blocked(reason.clone())),
            _ => Err(LlmError::EmptyResponse),
        };
    }

    Ok(text)
}

impl LlmClient for GeminiClient {
    fn generate(&self, prompt: &str, image: Option<&InlineImage>) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        let body = build_request(prompt, image);

        tracing::debug!(
            model = %self.model,
            with_image = image.is_some(),
            prompt_chars = prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        extract_text(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
