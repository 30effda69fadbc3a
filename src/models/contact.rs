use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted contact message, in characters.
pub const MAX_CONTACT_MESSAGE_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Contact form body. Missing fields deserialize as blank so they are
/// reported by `validate` rather than as a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Every field is required. Email syntax is checked by the caller.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err("Please fill in all fields".into());
        }
        if self.message.chars().count() > MAX_CONTACT_MESSAGE_CHARS {
            return Err(format!(
                "Message too long. Maximum {MAX_CONTACT_MESSAGE_CHARS} characters."
            ));
        }
        Ok(())
    }

    pub fn into_message(self) -> ContactMessage {
        ContactMessage {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}
