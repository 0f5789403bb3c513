use std::sync::Arc;
use std::time::Instant;

use super::escalation::decide_level;
use super::messages::{build_reasoning, build_recommendations, confidence_score, DISCLAIMER};
use super::red_flags::{detect_red_flags, matched_red_flags};
use super::safety::SafetyChecker;
use crate::models::{
    symptom_names, PipelineWarning, ProtocolMatch, SymptomRecord, TriageResult, Vitals,
};
use crate::pipeline::extraction::SymptomExtractor;
use crate::pipeline::retrieval::{ProtocolRetriever, RetrievalStrategy};

/// Turns extracted symptoms plus patient context into a `TriageResult`.
///
/// Retrieval runs on a scoped thread while red-flag detection and the
/// safety check run on the caller's thread. A failing retriever never
/// fails the assessment; it yields no protocol matches and a
/// `retrieval_degraded` warning.
pub struct TriageEngine {
    retriever: Arc<dyn ProtocolRetriever>,
    safety: SafetyChecker,
}

impl TriageEngine {
    pub fn new(retriever: Arc<dyn ProtocolRetriever>, safety: SafetyChecker) -> Self {
        Self { retriever, safety }
    }

    pub fn retrieval_strategy(&self) -> RetrievalStrategy {
        self.retriever.strategy()
    }

    pub fn decide(
        &self,
        symptoms: Vec<SymptomRecord>,
        vitals: Option<&Vitals>,
        medications: &[String],
        conditions: &[String],
    ) -> TriageResult {
        let started = Instant::now();
        let names = symptom_names(&symptoms);

        let (retrieved, is_emergency, safety_alerts) = std::thread::scope(|scope| {
            let retrieval = std::thread::Builder::new()
                .name("protocol-retrieval".into())
                .spawn_scoped(scope, || self.retriever.retrieve(&names));
            let is_emergency = detect_red_flags(&names);
            let alerts = self.safety.check_interactions(medications, conditions);
            let retrieved = match retrieval {
                Ok(handle) => handle.join(),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not spawn retrieval thread, retrieving inline");
                    Ok(self.retriever.retrieve(&names))
                }
            };
            (retrieved, is_emergency, alerts)
        });

        let mut warnings = Vec::new();
        let protocols: Vec<ProtocolMatch> = match retrieved {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::warn!(
                    strategy = %self.retriever.strategy(),
                    error = %e,
                    "Protocol retrieval failed, continuing without protocols"
                );
                warnings.push(PipelineWarning::RetrievalDegraded);
                vec![]
            }
            Err(_) => {
                tracing::warn!("Protocol retrieval panicked, continuing without protocols");
                warnings.push(PipelineWarning::RetrievalDegraded);
                vec![]
            }
        };

        let decision = decide_level(is_emergency, &symptoms, &safety_alerts);
        let reasoning = build_reasoning(
            symptoms.len(),
            &protocols,
            safety_alerts.len(),
            is_emergency,
        );

        tracing::info!(
            level = %decision.level,
            reasons = ?decision.reasons,
            red_flags = ?matched_red_flags(&names),
            symptoms = symptoms.len(),
            protocols = protocols.len(),
            alerts = safety_alerts.len(),
            vitals = vitals.map_or(0, |v| v.len()),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Triage decision"
        );

        TriageResult {
            symptoms,
            triage_level: decision.level,
            summary: reasoning.clone(),
            reasoning,
            recommendations: build_recommendations(is_emergency, &protocols),
            confidence_score: confidence_score(&protocols),
            safety_alerts,
            disclaimer: DISCLAIMER.to_string(),
            warnings,
        }
    }

    /// Extract symptoms from free text, then `decide`.
    ///
    /// Extraction failure is not fatal: the decision runs on zero symptoms
    /// and the result carries an `extraction_unavailable` warning.
    pub fn analyze(
        &self,
        extractor: &dyn SymptomExtractor,
        text: &str,
        vitals: Option<&Vitals>,
        medications: &[String],
        conditions: &[String],
    ) -> TriageResult {
        let (symptoms, extraction_warning) = match extractor.extract(text) {
            Ok(symptoms) => (symptoms, None),
            Err(e) => {
                tracing::warn!(
                    extractor = %extractor.describe(),
                    error = %e,
                    "Symptom extraction failed, continuing with no symptoms"
                );
                (vec![], Some(PipelineWarning::ExtractionUnavailable))
            }
        };

        let mut result = self.decide(symptoms, vitals, medications, conditions);
        if let Some(warning) = extraction_warning {
            result.warnings.insert(0, warning);
        }
        result
    }
}
