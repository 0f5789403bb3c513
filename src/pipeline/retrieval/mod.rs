//! Protocol retrieval: symptom names in, ranked `ProtocolMatch`es out.
//!
//! Two strategies share the `ProtocolRetriever` seam. The strategy is
//! chosen once at startup by `build_retriever`.

pub mod embedder;
pub mod keyword;
pub mod library;
pub mod semantic;
pub mod types;
pub mod vector;

pub use embedder::*;
pub use keyword::*;
pub use library::*;
pub use semantic::*;
pub use types::*;
pub use vector::*;

use std::sync::Arc;

use thiserror::Error;

use super::ollama::OllamaError;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector search error: {0}")]
    VectorSearch(String),

    #[error("Failed to read protocol library {0}: {1}")]
    ReferenceDataLoad(String, String),

    #[error("Failed to parse protocol library {0}: {1}")]
    ReferenceDataParse(String, String),

    #[error("Protocol library is empty")]
    EmptyLibrary,
}

impl From<OllamaError> for RetrievalError {
    fn from(err: OllamaError) -> Self {
        Self::Embedding(err.to_string())
    }
}

/// Build the configured retriever over `library`.
///
/// The semantic strategy embeds the whole library here, so an unreachable
/// embedding backend fails startup instead of every request.
pub fn build_retriever(
    strategy: RetrievalStrategy,
    library: ProtocolLibrary,
    embedder: Option<Box<dyn EmbeddingModel>>,
) -> Result<Arc<dyn ProtocolRetriever>, RetrievalError> {
    if library.is_empty() {
        return Err(RetrievalError::EmptyLibrary);
    }

    match strategy {
        RetrievalStrategy::Keyword => Ok(Arc::new(KeywordRetriever::new(library))),
        RetrievalStrategy::Semantic => {
            let embedder = embedder.ok_or_else(|| {
                RetrievalError::Embedding("semantic retrieval needs an embedding model".into())
            })?;
            Ok(Arc::new(SemanticRetriever::new(library, embedder)?))
        }
    }
}
