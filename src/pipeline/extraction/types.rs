use super::ExtractionError;
use crate::models::SymptomRecord;

/// Turns a free-text symptom description into structured records.
pub trait SymptomExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<SymptomRecord>, ExtractionError>;

    /// Short label for health reporting and logs.
    fn describe(&self) -> String;
}

/// Text generation backend used by the LLM extractor.
pub trait LlmClient: Send + Sync {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, ExtractionError>;

    fn is_model_available(&self, model: &str) -> Result<bool, ExtractionError>;

    fn list_models(&self) -> Result<Vec<String>, ExtractionError>;
}
