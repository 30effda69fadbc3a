use serde::Deserialize;
use serde_json::Value;

use super::types::{AnalysisFindings, DiagnosisRecord, RecommendationSet};
use super::NormalizeError;

/// Parse a JSON candidate into image-analysis findings.
///
/// Any JSON object is accepted; absent fields default to empty. The
/// allow-list filter is applied by the caller, not here.
pub fn parse_analysis(json_str: &str) -> Result<AnalysisFindings, NormalizeError> {
    #[derive(Deserialize)]
    struct RawAnalysis {
        #[serde(alias = "Diagnosis")]
        diagnosis: Option<Value>,
        #[serde(alias = "Observations")]
        observations: Option<Value>,
        #[serde(alias = "Potential Conditions", alias = "potentialConditions")]
        potential_conditions: Option<Value>,
        #[serde(alias = "Areas of Concern", alias = "areasOfConcern")]
        areas_of_concern: Option<Value>,
    }

    let raw: RawAnalysis = parse_object(json_str)?;
    Ok(AnalysisFindings {
        diagnosis: text_field(raw.diagnosis).unwrap_or_default(),
        observations: string_list(raw.observations),
        potential_conditions: string_list(raw.potential_conditions),
        areas_of_concern: string_list(raw.areas_of_concern),
    })
}

/// Parse a JSON candidate into a symptom diagnosis. Accepts both snake_case
/// keys and the title-case labels the consultation prompt uses.
pub fn parse_diagnosis(json_str: &str) -> Result<DiagnosisRecord, NormalizeError> {
    #[derive(Deserialize)]
    struct RawDiagnosis {
        #[serde(alias = "Possible Diagnosis", alias = "possibleDiagnosis", alias = "diagnosis")]
        possible_diagnosis: Option<Value>,
        #[serde(alias = "Potential Disease", alias = "potentialDisease", alias = "disease")]
        potential_disease: Option<Value>,
        #[serde(alias = "Symptoms")]
        symptoms: Option<Value>,
        #[serde(alias = "Recommended Treatment", alias = "recommendedTreatment", alias = "treatment")]
        recommended_treatment: Option<Value>,
        #[serde(alias = "Prevention Tips", alias = "preventionTips")]
        prevention_tips: Option<Value>,
    }

    let raw: RawDiagnosis = parse_object(json_str)?;
    Ok(DiagnosisRecord {
        possible_diagnosis: text_field(raw.possible_diagnosis).unwrap_or_default(),
        potential_disease: text_field(raw.potential_disease).unwrap_or_default(),
        symptoms: string_list(raw.symptoms),
        recommended_treatment: string_list(raw.recommended_treatment),
        prevention_tips: string_list(raw.prevention_tips),
    })
}

/// Parse a JSON candidate into a recommendation set.
///
/// A flat `recommendations` list is read as preventive measures. An object
/// with both lists empty is a valid "nothing to report" answer.
pub fn parse_recommendations(json_str: &str) -> Result<RecommendationSet, NormalizeError> {
    #[derive(Deserialize)]
    struct RawRecommendations {
        #[serde(
            alias = "Possible Future Conditions",
            alias = "possibleFutureConditions",
            alias = "future_conditions"
        )]
        possible_future_conditions: Option<Value>,
        #[serde(alias = "Preventive Measures", alias = "preventiveMeasures")]
        preventive_measures: Option<Value>,
        #[serde(alias = "Recommendations")]
        recommendations: Option<Value>,
    }

    let raw: RawRecommendations = parse_object(json_str)?;
    let mut preventive_measures = string_list(raw.preventive_measures);
    preventive_measures.extend(string_list(raw.recommendations));

    Ok(RecommendationSet {
        possible_future_conditions: string_list(raw.possible_future_conditions),
        preventive_measures,
    })
}

/// Deserialize only from a JSON object. serde would otherwise accept a
/// top-level array as a positional struct.
fn parse_object<T: for<'de> Deserialize<'de>>(json_str: &str) -> Result<T, NormalizeError> {
    let value: Value =
        serde_json::from_str(json_str).map_err(|e| NormalizeError::JsonParsing(e.to_string()))?;
    match value {
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| NormalizeError::JsonParsing(e.to_string()))
        }
        other => Err(NormalizeError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalar field as text. Strings are trimmed; numbers and booleans are
/// rendered; null, arrays and objects count as absent.
fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// List field, leniently: non-string items and blank strings are skipped,
/// and a bare string stands for a one-item list.
fn string_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => non_blank(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => non_blank(s).into_iter().collect(),
        _ => vec![],
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
