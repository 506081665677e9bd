//! Sentence and chunk descriptor types.

use serde::{Deserialize, Serialize};

/// One segmented sentence of a document.
///
/// Created once by the segmenter and never mutated; everything downstream
/// refers to sentences by their position in the original document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sentence {
    /// Position in the original document
    pub index: usize,
    /// Candidate phrases extracted from the sentence
    pub tokens: Vec<String>,
    /// Literal sentence text
    pub raw_text: String,
}

impl Sentence {
    /// Create a sentence record.
    pub fn new(index: usize, tokens: Vec<String>, raw_text: impl Into<String>) -> Self {
        Self {
            index,
            tokens,
            raw_text: raw_text.into(),
        }
    }

    /// Number of candidate phrases in this sentence.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// A finalized (leaf) chunk produced by the recursive chunker.
///
/// Carries the sentence indices of the chunk and the keyword of the
/// backbone node the terminal phrase-extraction pass should attach to.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafChunk {
    /// Indices into the document's sentence list, in document order
    pub sentence_indices: Vec<usize>,
    /// Incoming keyword node name (may carry the abstract marker)
    pub keyword: String,
}

impl LeafChunk {
    /// Create a leaf chunk descriptor.
    pub fn new(sentence_indices: Vec<usize>, keyword: impl Into<String>) -> Self {
        Self {
            sentence_indices,
            keyword: keyword.into(),
        }
    }

    /// Total token count across the chunk's sentences.
    pub fn token_count(&self, sentences: &[Sentence]) -> usize {
        self.sentence_indices
            .iter()
            .filter_map(|&i| sentences.get(i))
            .map(Sentence::token_count)
            .sum()
    }
}
