//! Fixed texts and narrative builders for the triage result.

use crate::models::ProtocolMatch;

pub const EMERGENCY_DIRECTIVE: &str = "SEEK EMERGENCY MEDICAL ATTENTION IMMEDIATELY.";
pub const SELF_CARE_DIRECTIVE: &str =
    "Monitor symptoms and maintain hydration. Consult a physician if condition worsens.";
pub const GENERAL_ASSESSMENT: &str = "General assessment";
pub const DISCLAIMER: &str = "AI-generated decision support. Not a clinical diagnosis.";

pub const MAX_RECOMMENDATIONS: usize = 3;

/// Presence-based heuristic, not a calibrated probability.
pub const CONFIDENCE_WITH_PROTOCOLS: f64 = 0.92;
pub const CONFIDENCE_WITHOUT_PROTOCOLS: f64 = 0.82;

/// One-paragraph reasoning narrative, also used as the summary.
pub fn build_reasoning(
    symptom_count: usize,
    protocols: &[ProtocolMatch],
    alert_count: usize,
    is_emergency: bool,
) -> String {
    let matched = if protocols.is_empty() {
        GENERAL_ASSESSMENT.to_string()
    } else {
        protocols
            .iter()
            .map(ProtocolMatch::citation)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let red_flag = if is_emergency { "Positive" } else { "Negative" };

    format!(
        "Assessment based on {symptom_count} symptoms identified. \
         Clinical protocols matched: {matched}. \
         Safety alerts found: {alert_count}. \
         Red flag check: {red_flag}."
    )
}

/// Emergency directive first, then protocol advice in retrieval order,
/// falling back to generic self-care advice. Capped at three entries.
pub fn build_recommendations(is_emergency: bool, protocols: &[ProtocolMatch]) -> Vec<String> {
    let mut recommendations = Vec::new();
    if is_emergency {
        recommendations.push(EMERGENCY_DIRECTIVE.to_string());
    }
    recommendations.extend(protocols.iter().map(|p| p.protocol_text.clone()));
    if recommendations.is_empty() {
        recommendations.push(SELF_CARE_DIRECTIVE.to_string());
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

pub fn confidence_score(protocols: &[ProtocolMatch]) -> f64 {
    if protocols.is_empty() {
        CONFIDENCE_WITHOUT_PROTOCOLS
    } else {
        CONFIDENCE_WITH_PROTOCOLS
    }
}
