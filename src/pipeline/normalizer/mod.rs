//! Response normalizer: turns one free-form model completion into a typed
//! record.
//!
//! Each mode runs the same best-effort cascade:
//! 1. fenced ```` ```json ```` block, parsed as JSON
//! 2. the whole text parsed as JSON (only when no fence exists)
//! 3. markdown section scan (recommendation mode only)
//! 4. the raw text as a single free-text field
//!
//! Any JSON object from steps 1-2 is the answer, with absent fields left
//! empty. Only malformed JSON or a non-object falls through to the next step.
//! Callers always receive a record; `NormalizeError` never crosses this
//! module's API.

pub mod allowlist;
pub mod fence;
pub mod parser;
pub mod prompt;
pub mod sections;
pub mod types;

pub use allowlist::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("No recognizable sections in response")]
    NoSections,
}

/// Normalize an image-analysis completion.
///
/// `potential_conditions` of the result is always a subset of
/// [`DISEASE_ALLOWLIST`], whichever step produced it.
pub fn normalize_analysis(raw: &str) -> AnalysisFindings {
    let mut findings = match parser::parse_analysis(fence::json_candidate(raw)) {
        Ok(findings) => findings,
        Err(e) => {
            tracing::debug!(
                mode = NormalizeMode::ImageAnalysis.as_str(),
                error = %e,
                "Analysis response is not structured, keeping raw text"
            );
            AnalysisFindings::from_raw_text(raw)
        }
    };
    findings.potential_conditions =
        filter_allowed_conditions(std::mem::take(&mut findings.potential_conditions));
    findings
}

/// Normalize a symptom-diagnosis completion.
pub fn normalize_diagnosis(raw: &str) -> DiagnosisRecord {
    match parser::parse_diagnosis(fence::json_candidate(raw)) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(
                mode = NormalizeMode::SymptomDiagnosis.as_str(),
                error = %e,
                "Diagnosis response is not structured, keeping raw text"
            );
            DiagnosisRecord::from_raw_text(raw)
        }
    }
}

/// Normalize a recommendation completion.
pub fn normalize_recommendations(raw: &str) -> RecommendationSet {
    match parser::parse_recommendations(fence::json_candidate(raw)) {
        Ok(set) => return set,
        Err(e) => {
            tracing::debug!(
                mode = NormalizeMode::Recommendation.as_str(),
                error = %e,
                "Recommendation response is not JSON, scanning sections"
            );
        }
    }

    match sections::extract_recommendations(raw) {
        Ok(set) => set,
        Err(e) => {
            tracing::debug!(
                mode = NormalizeMode::Recommendation.as_str(),
                error = %e,
                "No recommendation sections found, keeping raw text"
            );
            RecommendationSet::from_raw_text(raw)
        }
    }
}

/// Mode-dispatching entry point.
pub fn normalize(raw: &str, mode: NormalizeMode) -> NormalizedResponse {
    match mode {
        NormalizeMode::ImageAnalysis => NormalizedResponse::Analysis(normalize_analysis(raw)),
        NormalizeMode::SymptomDiagnosis => NormalizedResponse::Diagnosis(normalize_diagnosis(raw)),
        NormalizeMode::Recommendation => {
            NormalizedResponse::Recommendation(normalize_recommendations(raw))
        }
    }
}
