use super::RetrievalError;
use crate::models::ProtocolMatch;

pub use crate::models::RetrievalStrategy;

/// Finds clinical protocols relevant to a set of symptom names.
pub trait ProtocolRetriever: Send + Sync {
    /// Matches in relevance order. An empty list is a valid answer.
    fn retrieve(&self, symptom_names: &[String]) -> Result<Vec<ProtocolMatch>, RetrievalError>;

    fn strategy(&self) -> RetrievalStrategy;
}

/// Text embedding backend for semantic retrieval.
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError>;
    fn model_name(&self) -> &str;
}

/// Allow `Box<dyn EmbeddingModel>` to be used as `&impl EmbeddingModel`.
impl EmbeddingModel for Box<dyn EmbeddingModel> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        (**self).embed_batch(texts)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
