//! Emergency phrase pre-check.
//!
//! Runs independently of severity grading: a red flag forces EMERGENCY
//! regardless of how the extractor graded the symptom.

/// Phrases that indicate a potential medical emergency (lowercase).
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "shortness of breath",
    "unconscious",
    "difficulty breathing",
    "loss of consciousness",
    "seizure",
    "severe bleeding",
    "slurred speech",
    "coughing up blood",
];

/// True when any emergency keyword appears in the joined symptom names.
///
/// Names are joined with a single space before matching, so a phrase split
/// across two adjacent entries still counts.
pub fn detect_red_flags<S: AsRef<str>>(symptom_names: &[S]) -> bool {
    let haystack = joined_lowercase(symptom_names);
    EMERGENCY_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

/// All emergency keywords present in the joined symptom names.
pub fn matched_red_flags<S: AsRef<str>>(symptom_names: &[S]) -> Vec<&'static str> {
    let haystack = joined_lowercase(symptom_names);
    EMERGENCY_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| haystack.contains(kw))
        .collect()
}

fn joined_lowercase<S: AsRef<str>>(symptom_names: &[S]) -> String {
    symptom_names
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
