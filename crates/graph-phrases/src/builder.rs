//! Terminal node and edge materialization.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use graph_embeddings::{Embedding, EmbeddingModel};
use graph_types::{
    Edge, Node, NodeDescription, NodeKind, OriginalSentence, ABSTRACT_MARKER,
};
use graph_vector::{NodePayload, VectorStore};

use crate::occurrences::PhraseOccurrences;

/// Strip the abstract marker off a node name.
fn bare_name(name: &str) -> &str {
    name.strip_suffix(ABSTRACT_MARKER).unwrap_or(name)
}

/// Builds relation edges between two linked nodes.
pub struct EdgeBuilder {
    max_relation_sentences: usize,
}

impl EdgeBuilder {
    /// Create a builder capped at the given number of literal relations.
    pub fn new(max_relation_sentences: usize) -> Self {
        Self {
            max_relation_sentences,
        }
    }

    /// Edges from `source_name` to `target`.
    ///
    /// The relation text is the literal sentence of each shared occurrence
    /// (up to the cap, one edge per sentence). Without a shared occurrence
    /// the single edge falls back to the generic label. A target equal to
    /// the source yields nothing.
    pub fn edges_between(
        &self,
        source_name: &str,
        target: &str,
        occurrences: &PhraseOccurrences,
        sentences: &[String],
    ) -> Vec<Edge> {
        let source = bare_name(source_name);
        if target == source {
            return Vec::new();
        }

        let empty = BTreeSet::new();
        let source_indices = occurrences.indices(source).unwrap_or(&empty);
        let target_indices = occurrences.indices(target).unwrap_or(&empty);

        let edges: Vec<Edge> = source_indices
            .intersection(target_indices)
            .take(self.max_relation_sentences)
            .filter_map(|&i| sentences.get(i))
            .map(|sentence| Edge::with_sentence(source_name, target, sentence))
            .collect();

        if edges.is_empty() {
            return vec![Edge::related(source_name, target)];
        }
        edges
    }
}

/// Builds and persists terminal nodes.
pub struct NodeFactory {
    store: Arc<dyn VectorStore>,
    model: Arc<dyn EmbeddingModel>,
    max_description_sentences: usize,
}

impl NodeFactory {
    /// Create a factory persisting through the given store and model.
    pub fn new(
        store: Arc<dyn VectorStore>,
        model: Arc<dyn EmbeddingModel>,
        max_description_sentences: usize,
    ) -> Self {
        Self {
            store,
            model,
            max_description_sentences,
        }
    }

    /// Create a node for a phrase and persist its vectors.
    ///
    /// The description is built from up to the first
    /// `max_description_sentences` occurrence sentences; a phrase with no
    /// occurrences gets a single empty placeholder entry. Persistence is
    /// best-effort: a store failure is logged and the in-memory node is
    /// still returned.
    pub fn make_node(
        &self,
        name: &str,
        occurrence_indices: &BTreeSet<usize>,
        sentences: &[String],
        source_id: &str,
        occurrence_embeddings: Option<&[Embedding]>,
    ) -> Node {
        let label = bare_name(name).to_string();
        let kind = if name.ends_with(ABSTRACT_MARKER) {
            NodeKind::Abstract
        } else {
            NodeKind::Concrete
        };

        let texts: Vec<&str> = occurrence_indices
            .iter()
            .take(self.max_description_sentences)
            .filter_map(|&i| sentences.get(i))
            .map(|s| s.as_str())
            .collect();

        let (descriptions, original_sentences) = if texts.is_empty() {
            (
                vec![NodeDescription {
                    description: String::new(),
                    source_id: source_id.to_string(),
                }],
                vec![OriginalSentence {
                    original_sentence: String::new(),
                    source_id: source_id.to_string(),
                    score: 1.0,
                }],
            )
        } else {
            (
                texts
                    .iter()
                    .map(|&s| NodeDescription {
                        description: s.to_string(),
                        source_id: source_id.to_string(),
                    })
                    .collect(),
                texts
                    .iter()
                    .map(|&s| OriginalSentence {
                        original_sentence: s.to_string(),
                        source_id: source_id.to_string(),
                        score: 1.0,
                    })
                    .collect(),
            )
        };

        let node = Node {
            label,
            name: name.to_string(),
            source_id: source_id.to_string(),
            descriptions,
            original_sentences,
            kind,
        };

        self.persist(&node, occurrence_embeddings);
        node
    }

    /// Upsert one point per description entry.
    ///
    /// Uses the already-computed occurrence embedding where available and
    /// embeds the description text (or the name, for empty placeholders)
    /// otherwise.
    pub fn persist(&self, node: &Node, occurrence_embeddings: Option<&[Embedding]>) {
        for (i, entry) in node.descriptions.iter().enumerate() {
            let vector = match occurrence_embeddings.and_then(|e| e.get(i)) {
                Some(embedding) => embedding.clone(),
                None => {
                    let text = if entry.description.is_empty() {
                        &node.label
                    } else {
                        &entry.description
                    };
                    match self.model.embed(text) {
                        Ok(embedding) => embedding,
                        Err(error) => {
                            warn!(name = %node.name, %error, "embedding failed, skipping point");
                            continue;
                        }
                    }
                }
            };

            // Point id derived from source, name, and description so
            // re-ingesting the same document replaces rather than
            // duplicates.
            let seed = format!("{}:{}", node.name, entry.description);
            let id = format!("{}-{:016x}", node.source_id, seahash::hash(seed.as_bytes()));

            let payload = NodePayload::new(&node.name, &entry.description, &node.source_id);
            if let Err(error) = self.store.upsert(&id, &vector, payload) {
                warn!(name = %node.name, %error, "vector store upsert failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_embeddings::HashEmbedder;
    use graph_vector::InMemoryStore;

    fn occurrences(raw: &[&[&str]]) -> PhraseOccurrences {
        let lists: Vec<Vec<String>> = raw
            .iter()
            .map(|l| l.iter().map(|p| p.to_string()).collect())
            .collect();
        PhraseOccurrences::from_phrase_lists(&lists)
    }

    fn sentences(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn factory(store: Arc<InMemoryStore>) -> NodeFactory {
        NodeFactory::new(store, Arc::new(HashEmbedder::default()), 5)
    }

    #[test]
    fn test_edges_use_shared_occurrence_sentences() {
        let occ = occurrences(&[&["market", "trade"], &["market"], &["market", "trade"]]);
        let sents = sentences(&["Both here.", "Market only.", "Both again."]);
        let builder = EdgeBuilder::new(4);

        let edges = builder.edges_between("market", "trade", &occ, &sents);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].relation, "Both here.");
        assert_eq!(edges[1].relation, "Both again.");
        assert!(edges.iter().all(|e| e.source == "market" && e.target == "trade"));
    }

    #[test]
    fn test_edges_cap_at_max_relation_sentences() {
        let occ = occurrences(&[
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
            &["a", "b"],
        ]);
        let sents = sentences(&["s0.", "s1.", "s2.", "s3.", "s4.", "s5."]);
        let edges = EdgeBuilder::new(4).edges_between("a", "b", &occ, &sents);
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn test_edges_fall_back_to_generic_relation() {
        let occ = occurrences(&[&["market"], &["trade"]]);
        let sents = sentences(&["First.", "Second."]);
        let edges = EdgeBuilder::new(4).edges_between("market", "trade", &occ, &sents);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, graph_types::RELATION_RELATED);
    }

    #[test]
    fn test_marked_source_matches_bare_occurrences() {
        let occ = occurrences(&[&["market", "trade"]]);
        let sents = sentences(&["Shared sentence."]);
        let edges = EdgeBuilder::new(4).edges_between("market*", "trade", &occ, &sents);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "market*");
        assert_eq!(edges[0].relation, "Shared sentence.");
    }

    #[test]
    fn test_no_self_edge() {
        let occ = occurrences(&[&["market"]]);
        let sents = sentences(&["One."]);
        let edges = EdgeBuilder::new(4).edges_between("market*", "market", &occ, &sents);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_make_node_descriptions_capped_at_five() {
        let store = Arc::new(InMemoryStore::new());
        let factory = factory(Arc::clone(&store));

        let indices: BTreeSet<usize> = (0..7).collect();
        let sents = sentences(&["s0.", "s1.", "s2.", "s3.", "s4.", "s5.", "s6."]);
        let node = factory.make_node("market", &indices, &sents, "doc-1", None);

        assert_eq!(node.descriptions.len(), 5);
        assert_eq!(node.descriptions[0].description, "s0.");
        assert_eq!(node.original_sentences.len(), 5);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_make_node_empty_occurrences_gets_placeholder() {
        let store = Arc::new(InMemoryStore::new());
        let factory = factory(Arc::clone(&store));

        let node = factory.make_node("market", &BTreeSet::new(), &[], "doc-1", None);
        assert_eq!(node.descriptions.len(), 1);
        assert!(node.descriptions[0].description.is_empty());
        // The placeholder still persists one point, embedded from the name.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_make_node_marked_name_is_abstract() {
        let store = Arc::new(InMemoryStore::new());
        let factory = factory(store);

        let node = factory.make_node("market*", &BTreeSet::new(), &[], "doc-1", None);
        assert!(node.is_abstract());
        assert_eq!(node.label, "market");
        assert_eq!(node.name, "market*");
    }

    #[test]
    fn test_persist_prefers_provided_embeddings() {
        let store = Arc::new(InMemoryStore::new());
        let factory = factory(Arc::clone(&store));

        let indices: BTreeSet<usize> = [0].into_iter().collect();
        let sents = sentences(&["The market grew."]);
        let provided = vec![Embedding::new(vec![1.0, 0.0, 0.0, 0.0])];
        factory.make_node("market", &indices, &sents, "doc-1", Some(&provided));

        let matches = store
            .search(&Embedding::new(vec![1.0, 0.0, 0.0, 0.0]), 1, None)
            .unwrap();
        assert!((matches[0].score - 1.0).abs() < 0.001);
    }
}
