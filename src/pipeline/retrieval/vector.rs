use super::RetrievalError;

/// In-memory cosine-similarity index keyed by protocol entry position.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexedVector>,
}

#[derive(Debug)]
struct IndexedVector {
    slot: usize,
    embedding: Vec<f32>,
}

/// One hit from `VectorIndex::search`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSlot {
    pub slot: usize,
    pub score: f32,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, slot: usize, embedding: Vec<f32>) -> Result<(), RetrievalError> {
        if let Some(first) = self.entries.first() {
            if first.embedding.len() != embedding.len() {
                return Err(RetrievalError::VectorSearch(format!(
                    "dimension mismatch: index has {}, got {}",
                    first.embedding.len(),
                    embedding.len()
                )));
            }
        }
        self.entries.push(IndexedVector { slot, embedding });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best `top_k` slots scoring at least `min_score`, highest first.
    /// Ties keep insertion order.
    pub fn search(&self, query: &[f32], top_k: usize, min_score: f32) -> Vec<ScoredSlot> {
        let mut scored: Vec<ScoredSlot> = self
            .entries
            .iter()
            .map(|entry| ScoredSlot {
                slot: entry.slot,
                score: cosine_similarity(query, &entry.embedding),
            })
            .filter(|hit| hit.score >= min_score)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
