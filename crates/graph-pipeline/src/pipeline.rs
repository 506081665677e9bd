//! The document-to-graph pipeline.
//!
//! Failure policy: a topic model failure aborts the document and yields
//! an empty result; embedding and store failures degrade to a partial
//! graph. No error is raised to the caller and nothing is retried.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument};

use graph_chunking::{ChunkingConfig, NameRegistry, RecursiveChunker};
use graph_embeddings::EmbeddingModel;
use graph_phrases::{NodeFactory, PhraseConfig, PhraseExtractor};
use graph_segment::{PhraseTokenizer, Segmenter};
use graph_topics::{TopicEstimator, TopicModelConfig};
use graph_types::{Edge, LeafChunk, Node, ABSTRACT_MARKER};
use graph_vector::VectorStore;

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Character length at which a document enters the recursive path
    pub recursion_char_threshold: Option<usize>,
    /// Chunker settings
    pub chunking: ChunkingConfig,
    /// Topic model settings
    pub topic_model: TopicModelConfig,
    /// Terminal phrase extraction settings
    pub phrases: PhraseConfig,
}

/// Default character threshold for the recursive path.
const DEFAULT_RECURSION_CHAR_THRESHOLD: usize = 2000;

/// The node and edge lists handed to the external graph store.
#[derive(Debug, Default, Serialize)]
pub struct GraphComponents {
    /// Concept nodes, document root first when present
    pub nodes: Vec<Node>,
    /// Relation edges
    pub edges: Vec<Edge>,
}

/// The full ingestion pipeline for one or more documents.
pub struct GraphPipeline<T: PhraseTokenizer> {
    segmenter: Segmenter<T>,
    estimator: TopicEstimator,
    chunker: RecursiveChunker,
    extractor: PhraseExtractor,
    node_factory: NodeFactory,
    recursion_char_threshold: usize,
}

impl<T: PhraseTokenizer> GraphPipeline<T> {
    /// Assemble a pipeline from its collaborators.
    pub fn new(
        tokenizer: T,
        model: Arc<dyn EmbeddingModel>,
        store: Arc<dyn VectorStore>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            segmenter: Segmenter::new(tokenizer),
            estimator: TopicEstimator::new(options.topic_model.clone()),
            chunker: RecursiveChunker::new(options.chunking, options.topic_model),
            extractor: PhraseExtractor::new(
                Arc::clone(&model),
                Arc::clone(&store),
                options.phrases.clone(),
            ),
            node_factory: NodeFactory::new(store, model, options.phrases.max_description_sentences),
            recursion_char_threshold: options
                .recursion_char_threshold
                .unwrap_or(DEFAULT_RECURSION_CHAR_THRESHOLD),
        }
    }

    /// Whether a document is long enough for the recursive path.
    pub fn uses_recursive_path(&self, text: &str) -> bool {
        text.chars().count() >= self.recursion_char_threshold
    }

    /// Turn one document into graph components, persisting every minted
    /// node's vectors along the way.
    ///
    /// Short documents are processed as a single chunk with one
    /// topic-estimation pass; long documents go through the recursive
    /// chunker. A topic model failure yields an empty result.
    #[instrument(skip_all, fields(source_id))]
    pub async fn extract_graph_components(&self, text: &str, source_id: &str) -> GraphComponents {
        let sentences = self.segmenter.segment(text);
        if sentences.is_empty() {
            info!("document has no sentences");
            return GraphComponents::default();
        }

        let mut components = GraphComponents::default();
        let mut registry;
        let leaves: Vec<LeafChunk>;

        if self.uses_recursive_path(text) {
            let outcome = match self.chunker.run(&sentences, source_id) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "chunking aborted");
                    return GraphComponents::default();
                }
            };
            info!(
                nodes = outcome.nodes.len(),
                leaves = outcome.leaves.len(),
                "chunking completed"
            );

            // Backbone nodes are persisted as-is; abstract hubs embed
            // their label in place of the empty description.
            for node in &outcome.nodes {
                self.node_factory.persist(node, None);
            }

            components.nodes = outcome.nodes;
            components.edges = outcome.edges;
            registry = outcome.registry;
            leaves = outcome.leaves;
        } else {
            // Single-chunk path: one topic-estimation pass, no recursion.
            let estimate = match self.estimator.estimate(&sentences) {
                Ok(estimate) => estimate,
                Err(e) => {
                    error!(error = %e, "topic estimation failed");
                    return GraphComponents::default();
                }
            };
            info!(keyword = %estimate.top_keyword, "processing document as a single chunk");

            registry = NameRegistry::new();
            registry.claim(&estimate.top_keyword);
            let keyword = format!("{}{}", estimate.top_keyword, ABSTRACT_MARKER);
            leaves = vec![LeafChunk::new((0..sentences.len()).collect(), keyword)];
        }

        // TF-IDF over all leaf chunks: each leaf is one document, so a
        // term weighs most in the leaf it is distinctive for.
        let leaf_token_docs: Vec<Vec<String>> = leaves
            .iter()
            .map(|leaf| {
                leaf.sentence_indices
                    .iter()
                    .flat_map(|&i| sentences[i].tokens.iter().cloned())
                    .collect()
            })
            .collect();
        let tfidf = graph_topics::TfIdf::from_token_docs(&leaf_token_docs);

        for (doc, leaf) in leaves.iter().enumerate() {
            let phrase_lists: Vec<Vec<String>> = leaf
                .sentence_indices
                .iter()
                .map(|&i| sentences[i].tokens.clone())
                .collect();
            let chunk_sentences: Vec<String> = leaf
                .sentence_indices
                .iter()
                .map(|&i| sentences[i].raw_text.clone())
                .collect();
            let weights: HashMap<String, f32> = tfidf.doc_scores(doc);

            let (nodes, edges) = self
                .extractor
                .extract_from_chunk(
                    &phrase_lists,
                    &chunk_sentences,
                    &leaf.keyword,
                    Some(&weights),
                    &mut registry,
                    source_id,
                )
                .await;
            components.nodes.extend(nodes);
            components.edges.extend(edges);
        }

        info!(
            nodes = components.nodes.len(),
            edges = components.edges.len(),
            "extraction complete"
        );
        components
    }

    /// Chunking-only mode: return the leaf chunks as plain text, for
    /// feeding external completion pipelines.
    pub fn manual_chunking(&self, text: &str) -> Vec<String> {
        let sentences = self.segmenter.segment(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        let outcome = match self.chunker.run(&sentences, "-1") {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, "chunking aborted");
                return Vec::new();
            }
        };

        outcome
            .leaves
            .iter()
            .map(|leaf| {
                leaf.sentence_indices
                    .iter()
                    .filter_map(|&i| sentences.get(i))
                    .map(|s| s.raw_text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}
