use std::sync::LazyLock;

use regex::Regex;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").unwrap());

/// Body of the first ```` ```json ```` fenced block, if any.
pub fn extract_json_block(text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Text to hand to the JSON parser: the fenced body when a fence exists,
/// otherwise the whole trimmed response.
pub fn json_candidate(text: &str) -> &str {
    extract_json_block(text).unwrap_or_else(|| text.trim())
}
