//! # graph-topics
//!
//! Statistical models for the chunking backbone: an LDA topic model over
//! sentence token lists, TF-IDF keyword ranking, and the sentence
//! similarity matrix derived from topic distributions.
//!
//! The topic model is fit exactly once per document; only the grouping
//! threshold changes as the recursion deepens, never the matrix.

pub mod config;
pub mod error;
pub mod estimator;
pub mod lda;
pub mod similarity;
pub mod tfidf;

pub use config::TopicModelConfig;
pub use error::TopicModelError;
pub use estimator::{TopicEstimate, TopicEstimator};
pub use lda::LdaModel;
pub use similarity::{cosine_similarity, SimilarityMatrix};
pub use tfidf::TfIdf;
