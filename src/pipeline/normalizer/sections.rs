//! Markdown section scan for recommendation completions that ignored the
//! JSON instruction.

use std::sync::LazyLock;

use regex::Regex;

use super::types::RecommendationSet;
use super::NormalizeError;

pub const FUTURE_CONDITIONS_TITLE: &str = "Possible Future Conditions";
pub const PREVENTIVE_MEASURES_TITLE: &str = "Preventive Measures";

const SECTION_TITLES: &[&str] = &[FUTURE_CONDITIONS_TITLE, PREVENTIVE_MEASURES_TITLE];

/// Lines containing any of these (case-insensitive) are model boilerplate.
const BOILERPLATE_PHRASES: &[&str] = &[
    "disclaimer",
    "this information is for",
    "suggestions above are",
];

static CONDITIONS_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Possible Future Conditions:(.*?)Preventive Measures:").unwrap()
});

static MEASURES_INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Preventive Measures:(.*)").unwrap());

/// Scan both recommendation sections. Errors when neither has any items.
///
/// The inline regex split is only tried when the text has no section
/// heading line at all.
pub fn extract_recommendations(text: &str) -> Result<RecommendationSet, NormalizeError> {
    let inline_allowed = !text.lines().any(is_section_heading);

    let mut possible_future_conditions = extract_section(text, FUTURE_CONDITIONS_TITLE);
    if possible_future_conditions.is_empty() && inline_allowed {
        possible_future_conditions = extract_inline(text, &CONDITIONS_INLINE);
    }

    let mut preventive_measures = extract_section(text, PREVENTIVE_MEASURES_TITLE);
    if preventive_measures.is_empty() && inline_allowed {
        preventive_measures = extract_inline(text, &MEASURES_INLINE);
    }

    let set = RecommendationSet {
        possible_future_conditions,
        preventive_measures,
    };
    if set.is_empty() {
        return Err(NormalizeError::NoSections);
    }
    Ok(set)
}

/// Items listed under `title`, up to the next section heading.
///
/// The section starts after the first heading-looking line that names this
/// title and no other, or failing that after the first line that names only
/// this title. Lines naming several sections (a preamble such as "Here are
/// the Possible Future Conditions and Preventive Measures:") never start a
/// section. A missing section is an empty list.
pub fn extract_section(text: &str, title: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let names_only_this = |line: &&str| titles_named(line) == [title];

    let start = lines
        .iter()
        .position(|line| names_only_this(line) && is_heading(line))
        .or_else(|| lines.iter().position(names_only_this));

    let Some(start) = start else {
        return vec![];
    };

    lines[start + 1..]
        .iter()
        .take_while(|line| !starts_other_section(line, title))
        .filter(|line| !is_section_heading(line))
        .filter_map(|line| clean_line(line))
        .collect()
}

/// Single-paragraph fallback: `Title: a\n b ...` with no line breaks between
/// the sections.
fn extract_inline(text: &str, pattern: &Regex) -> Vec<String> {
    let Some(body) = pattern.captures(text).and_then(|caps| caps.get(1)) else {
        return vec![];
    };
    body.as_str().lines().filter_map(clean_line).collect()
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains("**") || trimmed.starts_with('#') || trimmed.ends_with(':')
}

/// Section titles mentioned in `line`, case-insensitively.
fn titles_named(line: &str) -> Vec<&'static str> {
    let lower = line.to_lowercase();
    SECTION_TITLES
        .iter()
        .copied()
        .filter(|title| lower.contains(&title.to_lowercase()))
        .collect()
}

fn is_section_heading(line: &str) -> bool {
    is_heading(line) && !titles_named(line).is_empty()
}

fn starts_other_section(line: &str, current: &str) -> bool {
    is_heading(line)
        && titles_named(line)
            .iter()
            .any(|title| !title.eq_ignore_ascii_case(current))
}

/// Strip list markers and bold markup; drop blanks and boilerplate.
pub fn clean_line(line: &str) -> Option<String> {
    let stripped = line
        .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_whitespace())
        .replace("**", "");
    let cleaned = stripped.trim();
    if cleaned.is_empty() || is_boilerplate(cleaned) {
        return None;
    }
    Some(cleaned.to_string())
}

fn is_boilerplate(line: &str) -> bool {
    let lower = line.to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|phrase| lower.contains(phrase))
}
