//! # graph-embeddings
//!
//! Sentence embedding generation for the textgraph pipeline.
//!
//! Phrase centrality scoring and node persistence both consume the
//! [`EmbeddingModel`] trait. The production implementation runs
//! all-MiniLM-L6-v2 locally via Candle; a deterministic feature-hashing
//! embedder is provided for offline tests.

pub mod cache;
pub mod candle;
pub mod error;
pub mod hashing;
pub mod model;

pub use crate::candle::SentenceEmbedder;
pub use cache::{get_or_download_model, ModelCache, ModelPaths, DEFAULT_MODEL_REPO, MODEL_FILES};
pub use error::EmbeddingError;
pub use hashing::HashEmbedder;
pub use model::{Embedding, EmbeddingModel, ModelInfo};
