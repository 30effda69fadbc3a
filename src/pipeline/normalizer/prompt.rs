use super::allowlist::DISEASE_ALLOWLIST;

/// Build the image-analysis prompt. The allow-list is spelled out so the
/// model restricts itself to the conditions the portal can report.
pub fn build_analysis_prompt() -> String {
    let diseases = DISEASE_ALLOWLIST.join(", ");
    format!(
        r#"You are a medical imaging expert analyzing a provided medical image (X-ray, MRI, or CT scan).
Your task is to detect and describe any abnormalities strictly related to the following conditions: {diseases}.

Instructions:
1. Diagnosis: identify whether the image suggests any of the above conditions.
2. Observations: list key findings and abnormalities visible in the scan.
3. Potential conditions: only include conditions from this list: {diseases}.
4. Areas of concern: highlight specific regions that require further investigation.

Respond with a single JSON block wrapped in ```json``` fences:

```json
{{
  "diagnosis": "Brief primary diagnosis",
  "observations": ["Detailed observation"],
  "potential_conditions": ["Only diseases from the predefined list"],
  "areas_of_concern": ["Specific area needing attention"]
}}
```

If no relevant abnormalities are found, return an empty "potential_conditions" array."#
    )
}

/// Build the symptom consultation prompt for free-text `symptoms`.
pub fn build_diagnosis_prompt(symptoms: &str) -> String {
    format!(
        r#"You are a virtual health consultant. A patient reports the following symptoms:

<symptoms>
{symptoms}
</symptoms>

Produce a diagnosis report as a single JSON block wrapped in ```json``` fences:

```json
{{
  "possible_diagnosis": "Most likely explanation",
  "potential_disease": "Disease name",
  "symptoms": ["Symptom considered"],
  "recommended_treatment": ["Treatment step"],
  "prevention_tips": ["Preventive measure"]
}}
```"#
    )
}

/// Build the recommendation prompt from the serialized analysis history.
pub fn build_recommendation_prompt(history_json: &str) -> String {
    format!(
        r#"You are an experienced doctor. Based on the patient's past medical image analyses below
(diagnoses, observations and potential conditions), project future health risks and
recommend preventive care, lifestyle changes and routine checkups.

<history>
{history_json}
</history>

Respond with a single JSON block wrapped in ```json``` fences:

```json
{{
  "possible_future_conditions": ["Condition the patient may develop"],
  "preventive_measures": ["Preventive measure, lifestyle change or checkup"]
}}
```

If you cannot produce JSON, use two markdown sections titled **Possible Future Conditions**
and **Preventive Measures** with one bullet per item."#
    )
}
