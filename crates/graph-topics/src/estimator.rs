//! Topic estimation over a document's sentences.
//!
//! Fits the LDA model once, derives the document's top keyword from a
//! single designated topic (topic 0), and builds the sentence similarity
//! matrix from per-sentence topic distributions.

use tracing::{info, warn};

use graph_types::Sentence;

use crate::config::TopicModelConfig;
use crate::error::TopicModelError;
use crate::lda::LdaModel;
use crate::similarity::SimilarityMatrix;

/// Output of one topic-estimation pass.
pub struct TopicEstimate {
    /// Highest-weight term of topic 0
    pub top_keyword: String,
    /// Pairwise cosine similarity of sentence topic distributions
    pub similarity: SimilarityMatrix,
}

/// Fits a topic model per document and derives chunking inputs from it.
pub struct TopicEstimator {
    config: TopicModelConfig,
}

impl TopicEstimator {
    /// Create an estimator with the given model configuration.
    pub fn new(config: TopicModelConfig) -> Self {
        Self { config }
    }

    /// Create an estimator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TopicModelConfig::default())
    }

    /// Fit the topic model over the sentences and produce the keyword and
    /// similarity matrix.
    ///
    /// Fails closed: any training failure is returned as an error and the
    /// caller must abort chunking for the document.
    pub fn estimate(&self, sentences: &[Sentence]) -> Result<TopicEstimate, TopicModelError> {
        let token_docs: Vec<Vec<String>> =
            sentences.iter().map(|s| s.tokens.clone()).collect();

        let model = LdaModel::fit(&token_docs, &self.config).map_err(|e| {
            warn!(error = %e, "topic model training failed");
            e
        })?;

        let distributions: Vec<Vec<f32>> = (0..model.doc_count())
            .map(|d| model.doc_topic_distribution(d))
            .collect();
        let similarity = SimilarityMatrix::from_vectors(&distributions);

        // Topic 0 by convention, not a best-topic search.
        let top_keyword = model
            .topic_top_term(0)
            .ok_or(TopicModelError::EmptyVocabulary)?
            .to_string();

        info!(
            sentences = sentences.len(),
            vocab = model.vocab_size(),
            keyword = %top_keyword,
            "topic estimation complete"
        );

        Ok(TopicEstimate {
            top_keyword,
            similarity,
        })
    }
}
