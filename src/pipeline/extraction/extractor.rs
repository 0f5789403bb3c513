use super::parser::parse_symptom_response;
use super::prompt::{build_extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use super::sanitize::{sanitize_symptom_text, MAX_SYMPTOM_TEXT_CHARS};
use super::types::{LlmClient, SymptomExtractor};
use super::ExtractionError;
use crate::models::SymptomRecord;
use crate::pipeline::ollama::OllamaClient;

/// Extra attempts when the model replies with something unparseable.
const MAX_PARSE_RETRIES: usize = 1;

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, ExtractionError> {
        OllamaClient::generate(self, model, prompt, system).map_err(ExtractionError::from)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, ExtractionError> {
        OllamaClient::is_model_available(self, model).map_err(ExtractionError::from)
    }

    fn list_models(&self) -> Result<Vec<String>, ExtractionError> {
        OllamaClient::list_models(self).map_err(ExtractionError::from)
    }
}

/// Symptom extraction backed by a local language model:
/// sanitize → prompt → LLM → parse
pub struct LlmSymptomExtractor<C: LlmClient> {
    client: C,
    model: String,
}

impl<C: LlmClient> LlmSymptomExtractor<C> {
    pub fn new(client: C, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the backend whether the configured model is installed.
    pub fn check_model(&self) -> ModelStatus {
        match self.client.is_model_available(&self.model) {
            Ok(true) => ModelStatus::Available,
            Ok(false) => ModelStatus::Missing {
                installed: self.client.list_models().unwrap_or_default(),
            },
            Err(e) => ModelStatus::Unreachable(e.to_string()),
        }
    }
}

/// Startup availability of the extraction model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStatus {
    Available,
    Missing { installed: Vec<String> },
    Unreachable(String),
}

fn is_parse_error(e: &ExtractionError) -> bool {
    matches!(
        e,
        ExtractionError::MalformedResponse(_) | ExtractionError::JsonParsing(_)
    )
}

impl<C: LlmClient> SymptomExtractor for LlmSymptomExtractor<C> {
    fn extract(&self, text: &str) -> Result<Vec<SymptomRecord>, ExtractionError> {
        let sanitized = sanitize_symptom_text(text, MAX_SYMPTOM_TEXT_CHARS)?;
        let prompt = build_extraction_prompt(&sanitized);

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .generate(&self.model, &prompt, EXTRACTION_SYSTEM_PROMPT)?;

            match parse_symptom_response(&response) {
                Ok(symptoms) => {
                    tracing::debug!(
                        model = %self.model,
                        count = symptoms.len(),
                        "Extracted symptoms"
                    );
                    return Ok(symptoms);
                }
                Err(e) if is_parse_error(&e) && attempt < MAX_PARSE_RETRIES => {
                    tracing::warn!(
                        model = %self.model,
                        attempt = attempt + 1,
                        error = %e,
                        "Extraction response parse failed, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn describe(&self) -> String {
        format!("llm:{}", self.model)
    }
}

/// Stand-in used when no extraction model is configured.
pub struct DisabledExtractor;

impl SymptomExtractor for DisabledExtractor {
    fn extract(&self, _text: &str) -> Result<Vec<SymptomRecord>, ExtractionError> {
        Err(ExtractionError::Unavailable(
            "no extraction model configured".into(),
        ))
    }

    fn describe(&self) -> String {
        "disabled".into()
    }
}

/// Mock LLM client for testing. Replays queued responses, repeating the last one.
#[cfg(test)]
pub struct MockLlmClient {
    responses: std::sync::Mutex<Vec<String>>,
    pub calls: std::sync::atomic::AtomicUsize,
    available_models: Vec<String>,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self::with_sequence(&[response])
    }

    pub fn with_sequence(responses: &[&str]) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            calls: std::sync::atomic::AtomicUsize::new(0),
            available_models: vec!["medgemma:latest".to_string()],
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, _prompt: &str, _system: &str) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut queue = self.responses.lock().unwrap();
        if queue.len() > 1 {
            Ok(queue.pop().unwrap_or_default())
        } else {
            Ok(queue.last().cloned().unwrap_or_default())
        }
    }

    fn is_model_available(&self, model: &str) -> Result<bool, ExtractionError> {
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self.available_models.clone())
    }
}
