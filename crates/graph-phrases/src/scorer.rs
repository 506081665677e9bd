//! Phrase importance scoring.
//!
//! Each phrase is embedded through the sentences it occurs in (with the
//! phrase bracket-highlighted inline), averaged into a phrase centroid,
//! and scored by term weight x cosine similarity to the chunk centroid.
//!
//! Embedding runs on a bounded worker pool and the pass waits for every
//! phrase before scoring (barrier). Completion order of the workers is
//! irrelevant: results are re-assembled in stable phrase order, so score
//! computation is reproducible.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use graph_embeddings::{Embedding, EmbeddingModel};

use crate::occurrences::PhraseOccurrences;

/// A phrase with its importance score and embeddings.
#[derive(Debug, Clone)]
pub struct ScoredPhrase {
    /// The phrase text
    pub phrase: String,
    /// Term weight x centrality
    pub score: f32,
    /// Mean embedding of the phrase's highlighted occurrence sentences
    pub centroid: Embedding,
    /// Per-occurrence sentence embeddings, in occurrence order
    pub occurrence_embeddings: Vec<Embedding>,
}

/// Computes importance scores for a leaf chunk's phrases.
pub struct PhraseScorer {
    model: Arc<dyn EmbeddingModel>,
    concurrency: usize,
}

impl PhraseScorer {
    /// Create a scorer over an embedding model with a fixed worker count.
    pub fn new(model: Arc<dyn EmbeddingModel>, concurrency: usize) -> Self {
        Self {
            model,
            concurrency: concurrency.max(1),
        }
    }

    /// Score every phrase of the chunk.
    ///
    /// `term_weights` are the chunk's TF-IDF scores; phrases absent from a
    /// supplied map weigh zero. Without a map, the weight falls back to
    /// occurrence frequency. A phrase whose embedding fails is logged and
    /// dropped; it produces no node.
    pub async fn score(
        &self,
        occurrences: &PhraseOccurrences,
        sentences: &[String],
        term_weights: Option<&HashMap<String, f32>>,
    ) -> Vec<ScoredPhrase> {
        // Stable phrase order; completion order of workers may differ.
        let jobs: Vec<(String, Vec<String>)> = occurrences
            .iter()
            .map(|(phrase, indices)| {
                let texts: Vec<String> = indices
                    .iter()
                    .filter_map(|&i| sentences.get(i))
                    .map(|s| highlight(s, phrase))
                    .collect();
                (phrase.clone(), texts)
            })
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let tasks = jobs.into_iter().map(|(phrase, texts)| {
            let semaphore = Arc::clone(&semaphore);
            let model = Arc::clone(&self.model);
            async move {
                // Semaphore closes only on drop; treat failure as fatal
                // for this phrase alone.
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (phrase, Err("worker pool closed".to_string())),
                };
                let result =
                    tokio::task::spawn_blocking(move || model.embed_texts(&texts)).await;
                let embeddings = match result {
                    Ok(Ok(embeddings)) => Ok(embeddings),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                (phrase, embeddings)
            }
        });

        // Barrier: every phrase embedding completes before scoring starts.
        let results: HashMap<String, Vec<Embedding>> = join_all(tasks)
            .await
            .into_iter()
            .filter_map(|(phrase, result)| match result {
                Ok(embeddings) if !embeddings.is_empty() => Some((phrase, embeddings)),
                Ok(_) => {
                    debug!(%phrase, "no occurrence sentences to embed");
                    None
                }
                Err(error) => {
                    warn!(%phrase, %error, "phrase embedding failed, dropping phrase");
                    None
                }
            })
            .collect();

        // Re-assemble in stable phrase order.
        let mut centroids: Vec<(String, Embedding, Vec<Embedding>)> = Vec::new();
        for (phrase, _) in occurrences.iter() {
            if let Some(embeddings) = results.get(phrase) {
                if let Some(centroid) = Embedding::mean(embeddings) {
                    centroids.push((phrase.clone(), centroid, embeddings.clone()));
                }
            }
        }

        let chunk_centroid = match Embedding::mean(
            &centroids.iter().map(|(_, c, _)| c.clone()).collect::<Vec<_>>(),
        ) {
            Some(centroid) => centroid,
            None => return Vec::new(),
        };

        let total_sentences = sentences.len().max(1);
        let mut scored: Vec<ScoredPhrase> = centroids
            .into_iter()
            .map(|(phrase, centroid, occurrence_embeddings)| {
                let weight = match term_weights {
                    Some(weights) => weights.get(&phrase).copied().unwrap_or(0.0),
                    None => {
                        let count = occurrences
                            .indices(&phrase)
                            .map(|indices| indices.len())
                            .unwrap_or(0);
                        count as f32 / total_sentences as f32
                    }
                };
                let centrality = centroid.cosine_similarity(&chunk_centroid);
                ScoredPhrase {
                    score: weight * centrality,
                    phrase,
                    centroid,
                    occurrence_embeddings,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.phrase.cmp(&b.phrase))
        });
        scored
    }
}

/// Mark the phrase inline in a sentence: `[phrase]`.
///
/// Case-insensitive, first occurrence only; a phrase that never appears
/// literally leaves the sentence unchanged.
fn highlight(sentence: &str, phrase: &str) -> String {
    let lower_sentence = sentence.to_lowercase();
    let lower_phrase = phrase.to_lowercase();
    match lower_sentence.find(&lower_phrase) {
        Some(start) => {
            let end = start + lower_phrase.len();
            // Byte offsets from the lowercased text are only safe when
            // they fall on character boundaries of the original.
            if sentence.is_char_boundary(start) && sentence.is_char_boundary(end) {
                format!(
                    "{}[{}]{}",
                    &sentence[..start],
                    &sentence[start..end],
                    &sentence[end..]
                )
            } else {
                sentence.to_string()
            }
        }
        None => sentence.to_string(),
    }
}
