use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AcceptanceStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_name: String,
    pub doctor_email: String,
    pub patient_name: String,
    pub patient_email: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub reason: String,
    pub acceptance_status: AcceptanceStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking form as submitted by the patient. The patient email comes from
/// the authenticated caller, not the form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub doctor_email: String,
    pub patient_name: String,
    /// `YYYY-MM-DD`
    pub appointment_date: String,
    /// `HH:MM`
    pub appointment_time: String,
    #[serde(default)]
    pub reason: String,
}

impl BookingRequest {
    /// Parse date and time, rejecting blank names.
    pub fn validate(&self) -> Result<(NaiveDate, NaiveTime), String> {
        if self.doctor_email.trim().is_empty() {
            return Err("Doctor email is required".into());
        }
        if self.patient_name.trim().is_empty() {
            return Err("Patient name is required".into());
        }
        let date = NaiveDate::parse_from_str(self.appointment_date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid appointment date format (expected YYYY-MM-DD)".to_string())?;
        let time = NaiveTime::parse_from_str(self.appointment_time.trim(), "%H:%M")
            .map_err(|_| "Invalid appointment time format (expected HH:MM)".to_string())?;
        Ok((date, time))
    }
}
