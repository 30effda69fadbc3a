use serde::{Deserialize, Serialize};

/// Which record shape a completion should be normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    ImageAnalysis,
    SymptomDiagnosis,
    Recommendation,
}

impl NormalizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImageAnalysis => "image_analysis",
            Self::SymptomDiagnosis => "symptom_diagnosis",
            Self::Recommendation => "recommendation",
        }
    }
}

/// Structured findings extracted from an image-analysis completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnalysisFindings {
    pub diagnosis: String,
    pub observations: Vec<String>,
    pub potential_conditions: Vec<String>,
    pub areas_of_concern: Vec<String>,
}

impl AnalysisFindings {
    /// The whole completion as the diagnosis, nothing else.
    pub fn from_raw_text(raw: &str) -> Self {
        Self {
            diagnosis: raw.to_string(),
            ..Default::default()
        }
    }
}

/// Per-request symptom consultation result. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiagnosisRecord {
    pub possible_diagnosis: String,
    pub potential_disease: String,
    pub symptoms: Vec<String>,
    pub recommended_treatment: Vec<String>,
    pub prevention_tips: Vec<String>,
}

impl DiagnosisRecord {
    pub fn from_raw_text(raw: &str) -> Self {
        Self {
            possible_diagnosis: raw.to_string(),
            ..Default::default()
        }
    }
}

/// Forward-looking risk summary derived from a user's past analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecommendationSet {
    pub possible_future_conditions: Vec<String>,
    pub preventive_measures: Vec<String>,
}

impl RecommendationSet {
    /// Unstructured completions are kept as one preventive-measure entry.
    pub fn from_raw_text(raw: &str) -> Self {
        let text = raw.trim();
        Self {
            possible_future_conditions: vec![],
            preventive_measures: if text.is_empty() {
                vec![]
            } else {
                vec![text.to_string()]
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.possible_future_conditions.is_empty() && self.preventive_measures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    Analysis(AnalysisFindings),
    Diagnosis(DiagnosisRecord),
    Recommendation(RecommendationSet),
}
