//! Symptom extraction: free text in, `SymptomRecord`s out.
//!
//! sanitize → prompt → LLM → lenient JSON parse.

pub mod extractor;
pub mod parser;
pub mod prompt;
pub mod sanitize;
pub mod types;

pub use extractor::*;
pub use types::*;

use thiserror::Error;

use super::ollama::OllamaError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Symptom extraction unavailable: {0}")]
    Unavailable(String),

    #[error("Language model returned error (status {status}): {body}")]
    LlmStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Symptom text is empty after sanitization")]
    InputEmpty,
}

impl From<OllamaError> for ExtractionError {
    fn from(err: OllamaError) -> Self {
        match err {
            OllamaError::Connection(url) => Self::Unavailable(format!("no Ollama at {url}")),
            OllamaError::Timeout(secs) => Self::Unavailable(format!("timed out after {secs}s")),
            OllamaError::Status { status, body } => Self::LlmStatus { status, body },
            OllamaError::HttpClient(msg) => Self::HttpClient(msg),
            OllamaError::ResponseParsing(msg) => Self::MalformedResponse(msg),
        }
    }
}
