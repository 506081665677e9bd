//! Topic model error types.

use thiserror::Error;

/// Errors that can occur while fitting or querying the topic model.
///
/// Any of these is fatal for the document being processed: the chunking
/// run aborts and returns an empty graph.
#[derive(Debug, Error)]
pub enum TopicModelError {
    /// The corpus contains no usable terms
    #[error("Empty vocabulary: no usable terms in corpus")]
    EmptyVocabulary,

    /// The corpus contains no sentences
    #[error("Empty corpus: no sentences to fit")]
    EmptyCorpus,

    /// Invalid model configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
