//! Triage level decision.
//!
//! Starts at ROUTINE and only ever raises the level. A red flag wins
//! outright; symptom severity and high-severity safety alerts can lift a
//! ROUTINE assessment to URGENT but never touch EMERGENCY.

use serde::Serialize;

use crate::models::{SafetyAlert, SymptomRecord, SymptomSeverity, TriageLevel};

/// Which rule raised the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    RedFlag,
    SevereSymptom,
    ModerateSymptom,
    SafetyAlert,
}

/// Outcome of the level decision with the rules that fired, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDecision {
    pub level: TriageLevel,
    pub reasons: Vec<EscalationReason>,
}

pub fn decide_level(
    is_emergency: bool,
    symptoms: &[SymptomRecord],
    alerts: &[SafetyAlert],
) -> LevelDecision {
    let mut level = TriageLevel::Routine;
    let mut reasons = Vec::new();

    if is_emergency {
        level = TriageLevel::Emergency;
        reasons.push(EscalationReason::RedFlag);
    } else if has_severity(symptoms, SymptomSeverity::Severe) {
        level = level.escalate_to(TriageLevel::Urgent);
        reasons.push(EscalationReason::SevereSymptom);
    } else if has_severity(symptoms, SymptomSeverity::Moderate) && level == TriageLevel::Routine {
        level = TriageLevel::Urgent;
        reasons.push(EscalationReason::ModerateSymptom);
    }

    if level == TriageLevel::Routine && alerts.iter().any(|a| a.severity.escalates_triage()) {
        level = TriageLevel::Urgent;
        reasons.push(EscalationReason::SafetyAlert);
    }

    LevelDecision { level, reasons }
}

fn has_severity(symptoms: &[SymptomRecord], severity: SymptomSeverity) -> bool {
    symptoms.iter().any(|s| s.severity == severity)
}
