use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: String,
    /// Years of practice.
    pub experience: u32,
    pub degree: String,
    pub clinic_location: String,
    pub fees: f64,
    pub contact_number: String,
    pub hospital_affiliation: String,
    pub availability: String,
    pub bio: String,
}

/// Editable doctor profile fields, as submitted by the doctor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub clinic_location: String,
    #[serde(default)]
    pub fees: f64,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub hospital_affiliation: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub bio: String,
}

impl DoctorProfile {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        if self.specialization.trim().is_empty() {
            return Err("Specialization is required".into());
        }
        if !self.fees.is_finite() || self.fees < 0.0 {
            return Err("Fees must be a non-negative number".into());
        }
        Ok(())
    }

    pub fn into_doctor(self, id: Uuid, email: &str) -> Doctor {
        Doctor {
            id,
            name: self.name.trim().to_string(),
            email: email.to_string(),
            specialization: self.specialization.trim().to_string(),
            experience: self.experience,
            degree: self.degree,
            clinic_location: self.clinic_location,
            fees: self.fees,
            contact_number: self.contact_number,
            hospital_affiliation: self.hospital_affiliation,
            availability: self.availability,
            bio: self.bio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorSort {
    #[default]
    Name,
    /// Most experienced first.
    Experience,
    /// Cheapest first.
    Fees,
}

/// Directory search. Every set criterion must match.
#[derive(Debug, Default, Deserialize)]
pub struct DoctorFilter {
    /// Exact email (case-insensitive).
    pub email: Option<String>,
    /// Substring of name, specialization or hospital affiliation.
    pub q: Option<String>,
    /// Exact specialization (case-insensitive); "all" disables it.
    pub specialization: Option<String>,
    /// Substring of clinic location.
    pub location: Option<String>,
    pub max_fees: Option<f64>,
    #[serde(default)]
    pub sort: DoctorSort,
}

impl DoctorFilter {
    pub fn matches(&self, doctor: &Doctor) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.trim().to_lowercase())
        };

        if let Some(email) = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            if !doctor.email.eq_ignore_ascii_case(email) {
                return false;
            }
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.trim().is_empty()) {
            if !(contains(&doctor.name, q)
                || contains(&doctor.specialization, q)
                || contains(&doctor.hospital_affiliation, q))
            {
                return false;
            }
        }
        if let Some(spec) = self
            .specialization
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        {
            if !doctor.specialization.eq_ignore_ascii_case(spec) {
                return false;
            }
        }
        if let Some(loc) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            if !contains(&doctor.clinic_location, loc) {
                return false;
            }
        }
        if let Some(max) = self.max_fees {
            if doctor.fees > max {
                return false;
            }
        }
        true
    }

    /// Filter and order `doctors`.
    pub fn apply(&self, doctors: Vec<Doctor>) -> Vec<Doctor> {
        let mut matched: Vec<Doctor> = doctors.into_iter().filter(|d| self.matches(d)).collect();
        match self.sort {
            DoctorSort::Name => matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            DoctorSort::Experience => matched.sort_by(|a, b| b.experience.cmp(&a.experience)),
            DoctorSort::Fees => matched.sort_by(|a, b| a.fees.total_cmp(&b.fees)),
        }
        matched
    }
}

/// Distinct specializations, sorted, for the directory dropdown.
pub fn specializations(doctors: &[Doctor]) -> Vec<String> {
    let mut specs: Vec<String> = doctors
        .iter()
        .map(|d| d.specialization.clone())
        .filter(|s| !s.is_empty())
        .collect();
    specs.sort();
    specs.dedup();
    specs
}
