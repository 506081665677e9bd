//! Chunking error types.

use thiserror::Error;

/// Errors that can occur during recursive chunking.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Topic model training failed; fatal for the document
    #[error("Topic model failure: {0}")]
    TopicModel(#[from] graph_topics::TopicModelError),
}
