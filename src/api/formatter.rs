//! Wire shape of an analysis.

use serde::{Deserialize, Serialize};

use crate::models::{PipelineWarning, SafetyAlert, SymptomRecord, TriageLevel, TriageResult};

/// `POST /analyze` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub symptoms: Vec<SymptomRecord>,
    pub triage_level: TriageLevel,
    pub reasoning: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub safety_alerts: Vec<SafetyAlert>,
    pub confidence_score: f64,
    pub disclaimer: String,
    #[serde(default)]
    pub warnings: Vec<PipelineWarning>,
}

pub fn format_triage_result(result: &TriageResult) -> AnalysisResponse {
    AnalysisResponse {
        symptoms: result.symptoms.clone(),
        triage_level: result.triage_level,
        reasoning: result.reasoning.clone(),
        summary: result.summary.clone(),
        recommendations: result.recommendations.clone(),
        safety_alerts: result.safety_alerts.clone(),
        confidence_score: result.confidence_score,
        disclaimer: result.disclaimer.clone(),
        warnings: result.warnings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, AlertSeverity, SymptomSeverity};

    fn sample_result() -> TriageResult {
        TriageResult {
            symptoms: vec![SymptomRecord::new("fever", SymptomSeverity::Moderate, Some("2 days"))],
            triage_level: TriageLevel::Urgent,
            reasoning: "Assessment based on 1 symptoms identified.".into(),
            summary: "Assessment based on 1 symptoms identified.".into(),
            recommendations: vec!["Rest.".into()],
            safety_alerts: vec![SafetyAlert::new(
                AlertKind::DrugInteraction,
                AlertSeverity::Critical,
                "Risk of bleeding",
                ["Warfarin".to_string(), "Aspirin".to_string()],
            )],
            confidence_score: 0.92,
            disclaimer: "AI-generated decision support. Not a clinical diagnosis.".into(),
            warnings: vec![PipelineWarning::RetrievalDegraded],
        }
    }

    #[test]
    fn wire_field_names() {
        let json = serde_json::to_value(format_triage_result(&sample_result())).unwrap();
        for field in [
            "symptoms",
            "triage_level",
            "reasoning",
            "summary",
            "recommendations",
            "safety_alerts",
            "confidence_score",
            "disclaimer",
            "warnings",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["triage_level"], "URGENT");
        assert_eq!(json["symptoms"][0]["severity"], "moderate");
        assert_eq!(json["warnings"][0], "retrieval_degraded");
    }

    #[test]
    fn confidence_is_exact_through_value() {
        let json = serde_json::to_value(format_triage_result(&sample_result())).unwrap();
        assert_eq!(json["confidence_score"], serde_json::json!(0.92));
        let text = serde_json::to_string(&json).unwrap();
        assert!(text.contains("\"confidence_score\":0.92"));
    }

    #[test]
    fn safety_alert_wire_shape() {
        let json = serde_json::to_value(format_triage_result(&sample_result())).unwrap();
        let alert = &json["safety_alerts"][0];
        assert_eq!(alert["severity"], "CRITICAL");
        assert_eq!(alert["risk"], "Risk of bleeding");
        assert_eq!(alert["kind"], "drug_interaction");
        assert_eq!(alert["involved_entities"], serde_json::json!(["Aspirin", "Warfarin"]));
    }

    #[test]
    fn missing_optional_lists_default_on_read() {
        let json = r#"{
            "symptoms": [], "triage_level": "ROUTINE", "reasoning": "r", "summary": "r",
            "recommendations": [], "confidence_score": 0.82, "disclaimer": "d"
        }"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert!(response.safety_alerts.is_empty());
        assert!(response.warnings.is_empty());
    }
}
