use serde::{Deserialize, Serialize};

use super::enums::SymptomSeverity;

/// A single symptom as produced by the extraction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    pub name: String,
    #[serde(default)]
    pub severity: SymptomSeverity,
    #[serde(default)]
    pub duration: Option<String>,
}

impl SymptomRecord {
    pub fn new(name: &str, severity: SymptomSeverity, duration: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            severity,
            duration: duration.map(|d| d.to_string()),
        }
    }
}

/// Names of a symptom list, in input order.
pub fn symptom_names(symptoms: &[SymptomRecord]) -> Vec<String> {
    symptoms.iter().map(|s| s.name.clone()).collect()
}
