/// Conditions the image-analysis flow is allowed to report.
pub const DISEASE_ALLOWLIST: &[&str] = &[
    "tuberculosis",
    "pneumonia",
    "heart diseases",
    "Alzheimer's",
    "malaria",
    "breast cancer",
    "brain tumor",
];

/// Allow-list spelling of `name`, matched case-insensitively. Typographic
/// apostrophes are treated as plain ones.
pub fn canonical_disease(name: &str) -> Option<&'static str> {
    let wanted = fold(name);
    DISEASE_ALLOWLIST
        .iter()
        .copied()
        .find(|candidate| fold(candidate) == wanted)
}

/// Keep only allow-listed conditions, in their canonical spelling, first
/// occurrence wins.
pub fn filter_allowed_conditions(conditions: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(conditions.len());
    for condition in &conditions {
        match canonical_disease(condition) {
            Some(canonical) if !kept.iter().any(|k| k == canonical) => {
                kept.push(canonical.to_string());
            }
            Some(_) => {}
            None => {
                tracing::debug!(condition = %condition, "Dropping condition outside allow-list");
            }
        }
    }
    kept
}

fn fold(name: &str) -> String {
    name.trim().replace('\u{2019}', "'").to_lowercase()
}
