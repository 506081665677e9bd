//! Terminal extraction over one finalized leaf chunk.
//!
//! Connects the finer-grained phrase layer to the keyword backbone: the
//! chunk's incoming keyword node gets its literal descriptions here, and
//! the top-scoring phrases become nodes edged to it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use graph_chunking::NameRegistry;
use graph_embeddings::EmbeddingModel;
use graph_types::{Edge, Node, ABSTRACT_MARKER};
use graph_vector::VectorStore;

use crate::builder::{EdgeBuilder, NodeFactory};
use crate::config::PhraseConfig;
use crate::grouper::group_cliques;
use crate::occurrences::PhraseOccurrences;
use crate::scorer::{PhraseScorer, ScoredPhrase};

/// Runs the terminal phrase-extraction pass for leaf chunks.
pub struct PhraseExtractor {
    scorer: PhraseScorer,
    edge_builder: EdgeBuilder,
    node_factory: NodeFactory,
    config: PhraseConfig,
}

impl PhraseExtractor {
    /// Create an extractor over the embedding and store collaborators.
    pub fn new(
        model: Arc<dyn EmbeddingModel>,
        store: Arc<dyn VectorStore>,
        config: PhraseConfig,
    ) -> Self {
        Self {
            scorer: PhraseScorer::new(Arc::clone(&model), config.embed_concurrency),
            edge_builder: EdgeBuilder::new(config.max_relation_sentences),
            node_factory: NodeFactory::new(store, model, config.max_description_sentences),
            config,
        }
    }

    /// Extract the phrase-node layer of one leaf chunk.
    ///
    /// `phrase_lists[i]` holds the candidate phrases of the chunk's local
    /// sentence `i`; `keyword` is the name of the incoming backbone node
    /// (possibly marker-suffixed). When the keyword does not occur among
    /// the chunk's phrases, the chunk contributes nothing.
    ///
    /// The registry is consulted and updated only from this single task;
    /// embedding workers never see it.
    pub async fn extract_from_chunk(
        &self,
        phrase_lists: &[Vec<String>],
        sentences: &[String],
        keyword: &str,
        term_weights: Option<&HashMap<String, f32>>,
        registry: &mut NameRegistry,
        source_id: &str,
    ) -> (Vec<Node>, Vec<Edge>) {
        if keyword.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let occurrences = PhraseOccurrences::from_phrase_lists(phrase_lists);
        if occurrences.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let bare_keyword = keyword.strip_suffix(ABSTRACT_MARKER).unwrap_or(keyword);
        let Some(keyword_indices) = occurrences.indices(bare_keyword) else {
            debug!(keyword, "incoming keyword absent from chunk phrases");
            return (Vec::new(), Vec::new());
        };
        let keyword_indices = keyword_indices.clone();

        // Barrier inside: all phrase embeddings complete before scoring.
        let scored = self
            .scorer
            .score(&occurrences, sentences, term_weights)
            .await;

        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        // The incoming keyword node, enriched with its literal occurrences.
        let keyword_embeddings = scored
            .iter()
            .find(|s| s.phrase == bare_keyword)
            .map(|s| s.occurrence_embeddings.as_slice());
        nodes.push(self.node_factory.make_node(
            keyword,
            &keyword_indices,
            sentences,
            source_id,
            keyword_embeddings,
        ));

        let clusters = group_cliques(&scored, self.config.clique_threshold);
        let children_of: HashMap<usize, &[usize]> = clusters
            .iter()
            .map(|c| (c.representative, c.members.as_slice()))
            .collect();

        let mut minted = 0;
        for (index, phrase) in scored.iter().enumerate() {
            if minted == self.config.max_phrase_nodes {
                break;
            }
            if !registry.claim(&phrase.phrase) {
                continue;
            }

            nodes.push(self.mint(phrase, &occurrences, sentences, source_id));
            edges.extend(self.edge_builder.edges_between(
                keyword,
                &phrase.phrase,
                &occurrences,
                sentences,
            ));
            minted += 1;

            // Near-duplicates ride along as auto-linked children, without
            // independent scoring and without counting toward the cap.
            let Some(members) = children_of.get(&index) else {
                continue;
            };
            for &member in members.iter().take(self.config.max_cluster_children) {
                let child = &scored[member];
                if !registry.claim(&child.phrase) {
                    continue;
                }
                nodes.push(self.mint(child, &occurrences, sentences, source_id));
                edges.extend(self.edge_builder.edges_between(
                    &phrase.phrase,
                    &child.phrase,
                    &occurrences,
                    sentences,
                ));
            }
        }

        debug!(
            keyword,
            nodes = nodes.len(),
            edges = edges.len(),
            "terminal extraction complete"
        );
        (nodes, edges)
    }

    fn mint(
        &self,
        phrase: &ScoredPhrase,
        occurrences: &PhraseOccurrences,
        sentences: &[String],
        source_id: &str,
    ) -> Node {
        let empty = std::collections::BTreeSet::new();
        let indices = occurrences.indices(&phrase.phrase).unwrap_or(&empty);
        self.node_factory.make_node(
            &phrase.phrase,
            indices,
            sentences,
            source_id,
            Some(&phrase.occurrence_embeddings),
        )
    }
}
