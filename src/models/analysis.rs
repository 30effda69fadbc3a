use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::normalizer::AnalysisFindings;

/// A stored image analysis. Immutable once inserted; owned by `owner_email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub owner_email: String,
    pub diagnosis: String,
    pub observations: Vec<String>,
    pub potential_conditions: Vec<String>,
    pub areas_of_concern: Vec<String>,
    /// Base64 of the submitted image.
    #[serde(skip_serializing)]
    pub image_data: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(
        findings: AnalysisFindings,
        image_data: String,
        mime_type: &str,
        owner_email: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            diagnosis: findings.diagnosis,
            observations: findings.observations,
            potential_conditions: findings.potential_conditions,
            areas_of_concern: findings.areas_of_concern,
            image_data,
            mime_type: mime_type.to_string(),
            created_at: Utc::now(),
        }
    }
}
