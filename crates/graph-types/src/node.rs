//! Graph node and edge artifacts.
//!
//! These are the records handed to the external graph store. The wire shape
//! (field names, nesting) matches the store's ingestion contract; everything
//! else about a node is internal.

use serde::{Deserialize, Serialize};

/// Marker appended to the names of abstract nodes.
///
/// Edges reference nodes by name, so the marker is part of the wire-visible
/// identity of an abstract node. Code must branch on [`NodeKind`], never by
/// parsing this suffix back out of the string.
pub const ABSTRACT_MARKER: char = '*';

/// Generic relation label used when two nodes share no occurrence sentence.
pub const RELATION_RELATED: &str = "Related";

/// Whether a node names a directly described concept or a splitting hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeKind {
    /// A concept with literal description text.
    #[default]
    Concrete,
    /// A splitting hub minted during decomposition; empty description,
    /// eligible for further decomposition.
    Abstract,
}

/// One description entry of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDescription {
    /// Description text (may be empty for abstract nodes)
    pub description: String,
    /// Document the description came from
    pub source_id: String,
}

/// One source-sentence entry of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OriginalSentence {
    /// Literal sentence text
    pub original_sentence: String,
    /// Document the sentence came from
    pub source_id: String,
    /// Relevance score of the sentence for this node
    pub score: f32,
}

/// A concept node of the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Display label (the bare keyword, no marker)
    pub label: String,
    /// Unique name within one ingestion run; abstract nodes carry the
    /// trailing marker so that edges can reference them unambiguously
    pub name: String,
    /// Source document identifier
    pub source_id: String,
    /// Description entries (empty description for abstract nodes)
    pub descriptions: Vec<NodeDescription>,
    /// Sentences the node was derived from
    pub original_sentences: Vec<OriginalSentence>,
    /// Concrete vs abstract; not part of the wire format
    #[serde(skip, default)]
    pub kind: NodeKind,
}

impl Node {
    /// Create an abstract splitting-hub node for a keyword.
    ///
    /// The name carries the abstract marker; the description is a single
    /// empty placeholder entry.
    pub fn abstract_hub(keyword: &str, source_id: &str) -> Self {
        Self {
            label: keyword.to_string(),
            name: format!("{}{}", keyword, ABSTRACT_MARKER),
            source_id: source_id.to_string(),
            descriptions: vec![NodeDescription {
                description: String::new(),
                source_id: source_id.to_string(),
            }],
            original_sentences: vec![OriginalSentence {
                original_sentence: String::new(),
                source_id: source_id.to_string(),
                score: 1.0,
            }],
            kind: NodeKind::Abstract,
        }
    }

    /// Create a concrete node described by literal sentences.
    pub fn concrete(keyword: &str, source_id: &str, sentences: &[&str]) -> Self {
        let descriptions = sentences
            .iter()
            .map(|s| NodeDescription {
                description: s.to_string(),
                source_id: source_id.to_string(),
            })
            .collect();
        let original_sentences = sentences
            .iter()
            .map(|s| OriginalSentence {
                original_sentence: s.to_string(),
                source_id: source_id.to_string(),
                score: 1.0,
            })
            .collect();
        Self {
            label: keyword.to_string(),
            name: keyword.to_string(),
            source_id: source_id.to_string(),
            descriptions,
            original_sentences,
            kind: NodeKind::Concrete,
        }
    }

    /// Whether this node is a splitting hub.
    pub fn is_abstract(&self) -> bool {
        self.kind == NodeKind::Abstract
    }

    /// Text to embed when persisting the node: the first non-empty
    /// description, falling back to the label.
    pub fn embeddable_text(&self) -> &str {
        self.descriptions
            .iter()
            .map(|d| d.description.as_str())
            .find(|d| !d.is_empty())
            .unwrap_or(&self.label)
    }
}

/// A relation edge between two named nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Name of the source node
    pub source: String,
    /// Name of the target node
    pub target: String,
    /// Literal co-occurring sentence, or [`RELATION_RELATED`]
    pub relation: String,
}

impl Edge {
    /// Create an edge labeled with a literal sentence.
    pub fn with_sentence(source: &str, target: &str, sentence: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            relation: sentence.to_string(),
        }
    }

    /// Create an edge with the generic fallback relation.
    pub fn related(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            relation: RELATION_RELATED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abstract_hub_name_carries_marker() {
        let node = Node::abstract_hub("economy", "doc-1");
        assert_eq!(node.name, "economy*");
        assert_eq!(node.label, "economy");
        assert!(node.is_abstract());
        assert_eq!(node.descriptions.len(), 1);
        assert!(node.descriptions[0].description.is_empty());
    }

    #[test]
    fn test_concrete_node_keeps_bare_name() {
        let node = Node::concrete("inflation", "doc-1", &["Prices rose sharply."]);
        assert_eq!(node.name, "inflation");
        assert!(!node.is_abstract());
        assert_eq!(node.descriptions[0].description, "Prices rose sharply.");
        assert_eq!(node.original_sentences[0].original_sentence, "Prices rose sharply.");
    }

    #[test]
    fn test_embeddable_text_falls_back_to_label() {
        let hub = Node::abstract_hub("economy", "doc-1");
        assert_eq!(hub.embeddable_text(), "economy");

        let concrete = Node::concrete("inflation", "doc-1", &["Prices rose."]);
        assert_eq!(concrete.embeddable_text(), "Prices rose.");
    }

    #[test]
    fn test_node_wire_format_excludes_kind() {
        let node = Node::abstract_hub("economy", "doc-1");
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("kind").is_none());
        assert_eq!(json["name"], "economy*");
        assert_eq!(json["label"], "economy");
        assert!(json["descriptions"].is_array());
        assert!(json["original_sentences"].is_array());
    }

    #[test]
    fn test_edge_constructors() {
        let e = Edge::with_sentence("a*", "b", "A relates to b.");
        assert_eq!(e.relation, "A relates to b.");

        let e = Edge::related("a*", "b");
        assert_eq!(e.relation, RELATION_RELATED);
    }
}
