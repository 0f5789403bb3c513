use super::types::EmbeddingModel;
use super::RetrievalError;
use crate::pipeline::ollama::OllamaClient;

pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Embeddings served by a local Ollama instance.
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

impl EmbeddingModel for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| RetrievalError::Embedding("empty embedding response".into()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.client.embed(&self.model, texts)?)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Deterministic bag-of-words embedder for tests: each lowercase word is
/// hashed into one of `dimension` buckets.
#[cfg(test)]
pub struct HashEmbedder {
    dimension: usize,
}

#[cfg(test)]
impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[cfg(test)]
impl EmbeddingModel for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let mut vector = vec![0.0; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = word
                .to_lowercase()
                .bytes()
                .fold(5381usize, |h, b| h.wrapping_mul(33).wrapping_add(b as usize))
                % self.dimension;
            vector[bucket] += 1.0;
        }
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn model_name(&self) -> &str {
        "hash-test"
    }
}
