pub mod extraction;
pub mod ollama;
pub mod retrieval;
