//! Shared types for the API layer.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::api::error::ApiError;
use crate::config::AppConfig;
use crate::intelligence::{SafetyChecker, SafetyReference, TriageEngine};
use crate::models::Vitals;
use crate::pipeline::extraction::sanitize::MAX_SYMPTOM_TEXT_CHARS;
use crate::pipeline::extraction::{
    DisabledExtractor, LlmSymptomExtractor, ModelStatus, SymptomExtractor,
};
use crate::pipeline::ollama::OllamaClient;
use crate::pipeline::retrieval::{
    build_retriever, EmbeddingModel, OllamaEmbedder, ProtocolLibrary, RetrievalStrategy,
};
use crate::StartupError;

pub const MAX_LIST_ITEMS: usize = 50;
pub const MAX_ITEM_CHARS: usize = 200;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Services shared read-only by every request.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<TriageEngine>,
    pub extractor: Arc<dyn SymptomExtractor>,
}

impl ApiContext {
    pub fn new(engine: TriageEngine, extractor: Arc<dyn SymptomExtractor>) -> Self {
        Self {
            engine: Arc::new(engine),
            extractor,
        }
    }

    /// Build every service from configuration.
    ///
    /// Must run outside an async context: the Ollama client is blocking and
    /// the semantic index is embedded here.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let reference = SafetyReference::load_or_builtin(&config.data_dir)?;
        let library = ProtocolLibrary::load_or_builtin(&config.data_dir)?;

        let needs_ollama =
            config.extraction_model.is_some() || config.retrieval == RetrievalStrategy::Semantic;
        let client = if needs_ollama {
            Some(OllamaClient::new(&config.ollama_url, config.timeout_secs)?)
        } else {
            None
        };

        let embedder: Option<Box<dyn EmbeddingModel>> = match (&client, config.retrieval) {
            (Some(client), RetrievalStrategy::Semantic) => Some(Box::new(OllamaEmbedder::new(
                client.clone(),
                &config.embed_model,
            ))),
            _ => None,
        };
        let retriever = build_retriever(config.retrieval, library, embedder)?;

        let extractor: Arc<dyn SymptomExtractor> = match (client, &config.extraction_model) {
            (Some(client), Some(model)) => {
                let extractor = LlmSymptomExtractor::new(client, model);
                match extractor.check_model() {
                    ModelStatus::Available => {
                        tracing::info!(model = %model, "Extraction model available")
                    }
                    ModelStatus::Missing { installed } => tracing::warn!(
                        model = %model,
                        installed = ?installed,
                        "Extraction model not installed in Ollama, requests will degrade"
                    ),
                    ModelStatus::Unreachable(e) => tracing::warn!(
                        model = %model,
                        error = %e,
                        "Could not reach Ollama, requests will degrade until it is up"
                    ),
                }
                Arc::new(extractor)
            }
            _ => {
                tracing::warn!("No extraction model configured, symptom extraction disabled");
                Arc::new(DisabledExtractor)
            }
        };

        Ok(Self::new(
            TriageEngine::new(retriever, SafetyChecker::new(reference)),
            extractor,
        ))
    }
}

// ═══════════════════════════════════════════════════════════
// Request types
// ═══════════════════════════════════════════════════════════

/// `POST /analyze` body.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub vitals: Option<Vitals>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub medications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub existing_conditions: Vec<String>,
    /// Accepted for compatibility; not used by the decision.
    #[serde(default)]
    pub user_context: Option<serde_json::Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.text.trim().is_empty() {
            return Err(ApiError::Validation("text must not be empty".into()));
        }
        let text_chars = self.text.chars().count();
        if text_chars > MAX_SYMPTOM_TEXT_CHARS {
            return Err(ApiError::Validation(format!(
                "text is {text_chars} characters, maximum is {MAX_SYMPTOM_TEXT_CHARS}"
            )));
        }
        validate_list("medications", &self.medications)?;
        validate_list("existing_conditions", &self.existing_conditions)?;
        Ok(())
    }
}

fn validate_list(field: &str, items: &[String]) -> Result<(), ApiError> {
    if items.len() > MAX_LIST_ITEMS {
        return Err(ApiError::Validation(format!(
            "{field} has {} entries, maximum is {MAX_LIST_ITEMS}",
            items.len()
        )));
    }
    if let Some(item) = items.iter().find(|i| i.chars().count() > MAX_ITEM_CHARS) {
        return Err(ApiError::Validation(format!(
            "{field} entry exceeds {MAX_ITEM_CHARS} characters: {}...",
            item.chars().take(20).collect::<String>()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::retrieval::RetrievalError;

    fn request(json: serde_json::Value) -> AnalyzeRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn optional_fields_default() {
        let req = request(serde_json::json!({"text": "fever"}));
        assert!(req.vitals.is_none());
        assert!(req.medications.is_empty());
        assert!(req.existing_conditions.is_empty());
        assert!(req.user_context.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn null_lists_are_empty() {
        let req = request(serde_json::json!({
            "text": "fever",
            "medications": null,
            "existing_conditions": null,
            "vitals": {"temperature": 38.9, "heart_rate": "110"}
        }));
        assert!(req.medications.is_empty());
        assert_eq!(req.vitals.unwrap().len(), 2);
    }

    #[test]
    fn blank_text_is_invalid() {
        let req = request(serde_json::json!({"text": "  \n "}));
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn overlong_text_is_invalid() {
        let req = request(serde_json::json!({"text": "a".repeat(MAX_SYMPTOM_TEXT_CHARS + 1)}));
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn text_limit_counts_characters() {
        let req = request(serde_json::json!({"text": "é".repeat(MAX_SYMPTOM_TEXT_CHARS)}));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn too_many_medications_is_invalid() {
        let meds: Vec<String> = (0..=MAX_LIST_ITEMS).map(|i| format!("drug{i}")).collect();
        let req = request(serde_json::json!({"text": "fever", "medications": meds}));
        assert!(matches!(req.validate(), Err(ApiError::Validation(msg)) if msg.contains("medications")));
    }

    #[test]
    fn overlong_condition_is_invalid() {
        let req = request(serde_json::json!({
            "text": "fever",
            "existing_conditions": ["x".repeat(MAX_ITEM_CHARS + 1)]
        }));
        assert!(
            matches!(req.validate(), Err(ApiError::Validation(msg)) if msg.contains("existing_conditions"))
        );
    }

    #[test]
    fn context_from_default_config_uses_keyword_and_disabled_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        let ctx = ApiContext::from_config(&config).unwrap();
        assert_eq!(ctx.engine.retrieval_strategy(), RetrievalStrategy::Keyword);
        assert_eq!(ctx.extractor.describe(), "disabled");
    }

    #[test]
    fn context_rejects_broken_protocol_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ProtocolLibrary::FILE_NAME), "[").unwrap();
        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        assert!(matches!(
            ApiContext::from_config(&config),
            Err(StartupError::Retrieval(RetrievalError::ReferenceDataParse(..)))
        ));
    }
}
