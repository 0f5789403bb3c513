use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::alert::SafetyAlert;
use super::enums::{PipelineWarning, TriageLevel};
use super::symptom::SymptomRecord;

/// Free-form vital signs (temperature, heart rate, ...) as sent by the caller.
pub type Vitals = BTreeMap<String, serde_json::Value>;

/// Final assessment for one request. Built once, never mutated, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub symptoms: Vec<SymptomRecord>,
    pub triage_level: TriageLevel,
    pub reasoning: String,
    /// Same narrative as `reasoning`.
    pub summary: String,
    pub recommendations: Vec<String>,
    pub safety_alerts: Vec<SafetyAlert>,
    pub confidence_score: f64,
    pub disclaimer: String,
    /// Collaborators that degraded while producing this result.
    pub warnings: Vec<PipelineWarning>,
}
