//! Deterministic feature-hashing embedder.
//!
//! Maps word hashes into a fixed number of buckets and normalizes the
//! resulting count vector. Texts sharing words get similar vectors, which
//! is enough signal for tests and offline runs without model files.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Default bucket count.
pub const DEFAULT_DIM: usize = 64;

/// Feature-hashing embedder.
pub struct HashEmbedder {
    info: ModelInfo,
}

impl HashEmbedder {
    /// Create an embedder with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            info: ModelInfo {
                name: "feature-hash".to_string(),
                dimension,
                max_sequence_length: usize::MAX,
            },
        }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl EmbeddingModel for HashEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let dim = self.info.dimension;
        let mut buckets = vec![0.0f32; dim];
        for word in text.split_whitespace() {
            let cleaned: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if cleaned.is_empty() {
                continue;
            }
            let mut hasher = DefaultHasher::new();
            cleaned.hash(&mut hasher);
            let bucket = (hasher.finish() % dim as u64) as usize;
            buckets[bucket] += 1.0;
        }
        Ok(Embedding::new(buckets))
    }
}
