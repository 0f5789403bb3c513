use std::collections::HashSet;

use super::library::ProtocolLibrary;
use super::types::{EmbeddingModel, ProtocolRetriever, RetrievalStrategy};
use super::vector::VectorIndex;
use super::RetrievalError;
use crate::models::ProtocolMatch;

pub const DEFAULT_TOP_K: usize = 2;
pub const DEFAULT_MIN_SCORE: f32 = 0.3;

/// Embedding-based retrieval. The library is embedded once at construction.
pub struct SemanticRetriever {
    library: ProtocolLibrary,
    embedder: Box<dyn EmbeddingModel>,
    index: VectorIndex,
    top_k: usize,
    min_score: f32,
}

impl SemanticRetriever {
    pub fn new(
        library: ProtocolLibrary,
        embedder: Box<dyn EmbeddingModel>,
    ) -> Result<Self, RetrievalError> {
        Self::with_params(library, embedder, DEFAULT_TOP_K, DEFAULT_MIN_SCORE)
    }

    pub fn with_params(
        library: ProtocolLibrary,
        embedder: Box<dyn EmbeddingModel>,
        top_k: usize,
        min_score: f32,
    ) -> Result<Self, RetrievalError> {
        let documents: Vec<String> = library.entries().iter().map(|e| e.document_text()).collect();
        let doc_refs: Vec<&str> = documents.iter().map(String::as_str).collect();
        let embeddings = embedder.embed_batch(&doc_refs)?;
        if embeddings.len() != documents.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }

        let mut index = VectorIndex::new();
        for (slot, embedding) in embeddings.into_iter().enumerate() {
            index.add(slot, embedding)?;
        }

        tracing::info!(
            model = embedder.model_name(),
            protocols = index.len(),
            "Built protocol vector index"
        );

        Ok(Self {
            library,
            embedder,
            index,
            top_k,
            min_score,
        })
    }
}

impl ProtocolRetriever for SemanticRetriever {
    fn retrieve(&self, symptom_names: &[String]) -> Result<Vec<ProtocolMatch>, RetrievalError> {
        let queries: Vec<&str> = symptom_names
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if queries.is_empty() {
            return Ok(vec![]);
        }

        let query_embeddings = self.embedder.embed_batch(&queries)?;
        let entries = self.library.entries();
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for embedding in &query_embeddings {
            for hit in self.index.search(embedding, self.top_k, self.min_score) {
                let Some(entry) = entries.get(hit.slot) else {
                    return Err(RetrievalError::VectorSearch(format!(
                        "index slot {} out of range",
                        hit.slot
                    )));
                };
                if seen.insert(entry.id.as_str()) {
                    matches.push(ProtocolMatch::from(entry));
                }
            }
        }

        Ok(matches)
    }

    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Semantic
    }
}
