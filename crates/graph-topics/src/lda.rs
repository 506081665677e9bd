//! Latent Dirichlet Allocation by collapsed Gibbs sampling.
//!
//! Pure Rust implementation over pre-tokenized sentences. The sampler runs
//! with a fixed seed and a fixed sweep count, so a given corpus always
//! yields the same model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::TopicModelConfig;
use crate::error::TopicModelError;

/// A fitted LDA model.
pub struct LdaModel {
    config: TopicModelConfig,
    /// Term strings, indexed by term id
    vocab: Vec<String>,
    /// Documents as term-id lists
    docs: Vec<Vec<usize>>,
    /// doc x topic assignment counts
    doc_topic: Vec<Vec<usize>>,
    /// topic x term assignment counts
    topic_term: Vec<Vec<usize>>,
    /// per-topic totals
    topic_total: Vec<usize>,
}

impl LdaModel {
    /// Fit a model over tokenized documents (one document per sentence).
    ///
    /// Fails closed on a degenerate corpus: no documents, or no usable
    /// terms at all.
    pub fn fit(
        token_docs: &[Vec<String>],
        config: &TopicModelConfig,
    ) -> Result<Self, TopicModelError> {
        config
            .validate()
            .map_err(TopicModelError::InvalidConfig)?;
        if token_docs.is_empty() {
            return Err(TopicModelError::EmptyCorpus);
        }

        // Build the vocabulary in first-seen order for determinism.
        let mut vocab: Vec<String> = Vec::new();
        let mut term_ids = std::collections::HashMap::new();
        let docs: Vec<Vec<usize>> = token_docs
            .iter()
            .map(|tokens| {
                tokens
                    .iter()
                    .map(|t| {
                        *term_ids.entry(t.clone()).or_insert_with(|| {
                            vocab.push(t.clone());
                            vocab.len() - 1
                        })
                    })
                    .collect()
            })
            .collect();

        if vocab.is_empty() {
            return Err(TopicModelError::EmptyVocabulary);
        }

        let k = config.num_topics;
        let v = vocab.len();
        let mut rng = StdRng::seed_from_u64(config.seed);

        // Random initial topic assignment per token position.
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        let mut doc_topic = vec![vec![0usize; k]; docs.len()];
        let mut topic_term = vec![vec![0usize; v]; k];
        let mut topic_total = vec![0usize; k];

        for (d, doc) in docs.iter().enumerate() {
            let mut doc_assign = Vec::with_capacity(doc.len());
            for &term in doc {
                let topic = rng.random_range(0..k);
                doc_assign.push(topic);
                doc_topic[d][topic] += 1;
                topic_term[topic][term] += 1;
                topic_total[topic] += 1;
            }
            assignments.push(doc_assign);
        }

        // Collapsed Gibbs sweeps.
        let alpha = config.alpha;
        let beta = config.beta;
        let v_beta = v as f64 * beta;
        let mut weights = vec![0.0f64; k];

        for sweep in 0..config.iterations {
            for (d, doc) in docs.iter().enumerate() {
                for (pos, &term) in doc.iter().enumerate() {
                    let old = assignments[d][pos];
                    doc_topic[d][old] -= 1;
                    topic_term[old][term] -= 1;
                    topic_total[old] -= 1;

                    let mut total = 0.0;
                    for (topic, weight) in weights.iter_mut().enumerate() {
                        *weight = (doc_topic[d][topic] as f64 + alpha)
                            * (topic_term[topic][term] as f64 + beta)
                            / (topic_total[topic] as f64 + v_beta);
                        total += *weight;
                    }

                    let mut draw = rng.random_range(0.0..total);
                    let mut new = k - 1;
                    for (topic, &weight) in weights.iter().enumerate() {
                        if draw < weight {
                            new = topic;
                            break;
                        }
                        draw -= weight;
                    }

                    assignments[d][pos] = new;
                    doc_topic[d][new] += 1;
                    topic_term[new][term] += 1;
                    topic_total[new] += 1;
                }
            }
            if sweep + 1 == config.iterations {
                debug!(sweeps = config.iterations, vocab = v, "Gibbs sampling done");
            }
        }

        Ok(Self {
            config: config.clone(),
            vocab,
            docs,
            doc_topic,
            topic_term,
            topic_total,
        })
    }

    /// Number of fitted documents.
    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    /// Vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Dense topic distribution of a document (smoothed, sums to 1).
    pub fn doc_topic_distribution(&self, doc: usize) -> Vec<f32> {
        let k = self.config.num_topics;
        let alpha = self.config.alpha;
        let len = self.docs[doc].len() as f64;
        let denom = len + k as f64 * alpha;
        (0..k)
            .map(|topic| ((self.doc_topic[doc][topic] as f64 + alpha) / denom) as f32)
            .collect()
    }

    /// Highest-weight term of a topic.
    ///
    /// Ties resolve to the earliest term in vocabulary order, which is
    /// first-seen corpus order.
    pub fn topic_top_term(&self, topic: usize) -> Option<&str> {
        if topic >= self.config.num_topics || self.vocab.is_empty() {
            return None;
        }
        let row = &self.topic_term[topic];
        let mut best = 0usize;
        for (term, &count) in row.iter().enumerate() {
            if count > row[best] {
                best = term;
            }
        }
        Some(&self.vocab[best])
    }

    /// Total tokens assigned to a topic.
    pub fn topic_size(&self, topic: usize) -> usize {
        self.topic_total.get(topic).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    fn sample_corpus() -> Vec<Vec<String>> {
        docs(&[
            &["market", "economy", "trade"],
            &["economy", "inflation"],
            &["protein", "cell", "biology"],
            &["cell", "membrane"],
            &["market", "trade", "tariff"],
        ])
    }

    #[test]
    fn test_fit_empty_corpus_fails() {
        let config = TopicModelConfig::default();
        assert!(matches!(
            LdaModel::fit(&[], &config),
            Err(TopicModelError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_fit_empty_vocabulary_fails() {
        let config = TopicModelConfig::default();
        let empty_docs = docs(&[&[], &[]]);
        assert!(matches!(
            LdaModel::fit(&empty_docs, &config),
            Err(TopicModelError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_distributions_sum_to_one() {
        let config = TopicModelConfig {
            iterations: 20,
            ..Default::default()
        };
        let model = LdaModel::fit(&sample_corpus(), &config).unwrap();
        for d in 0..model.doc_count() {
            let dist = model.doc_topic_distribution(d);
            assert_eq!(dist.len(), config.num_topics);
            let sum: f32 = dist.iter().sum();
            assert!((sum - 1.0).abs() < 0.001, "sum was {}", sum);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let config = TopicModelConfig {
            iterations: 20,
            ..Default::default()
        };
        let a = LdaModel::fit(&sample_corpus(), &config).unwrap();
        let b = LdaModel::fit(&sample_corpus(), &config).unwrap();
        for d in 0..a.doc_count() {
            assert_eq!(a.doc_topic_distribution(d), b.doc_topic_distribution(d));
        }
        assert_eq!(a.topic_top_term(0), b.topic_top_term(0));
    }

    #[test]
    fn test_top_term_is_from_vocabulary() {
        let config = TopicModelConfig {
            iterations: 20,
            ..Default::default()
        };
        let corpus = sample_corpus();
        let model = LdaModel::fit(&corpus, &config).unwrap();
        let term = model.topic_top_term(0).unwrap().to_string();
        assert!(corpus.iter().flatten().any(|t| *t == term));
    }

    #[test]
    fn test_top_term_out_of_range_topic() {
        let config = TopicModelConfig {
            iterations: 5,
            ..Default::default()
        };
        let model = LdaModel::fit(&sample_corpus(), &config).unwrap();
        assert!(model.topic_top_term(99).is_none());
    }
}
