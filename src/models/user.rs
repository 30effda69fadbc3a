use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::UserRole;

/// Portal account profile, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub age: Option<u32>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Profile fields the caller may set. The email comes from the
/// authenticated caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub gender: String,
    pub age: Option<u32>,
    pub role: UserRole,
}

const MAX_AGE: u32 = 150;

impl UserProfile {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        if self.age.is_some_and(|age| age > MAX_AGE) {
            return Err(format!("Age must be at most {MAX_AGE}"));
        }
        Ok(())
    }

    pub fn into_user(self, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: email.to_string(),
            gender: self.gender.trim().to_string(),
            age: self.age,
            role: self.role,
            created_at: Utc::now(),
        }
    }
}
