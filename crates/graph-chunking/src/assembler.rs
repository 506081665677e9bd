//! Node and edge assembly for one recursion level.
//!
//! Converts the subgroup partition of a chunk into child chunk
//! descriptors, representative keyword nodes, and edges linking each
//! child to the parent keyword node.

use tracing::debug;

use graph_topics::TfIdf;
use graph_types::{Edge, Node, Sentence};

use crate::config::ChunkingConfig;
use crate::registry::NameRegistry;

/// Sentinel keyword for subgroups that yielded no unclaimed candidate.
///
/// Branches carrying it are skipped on recursion, which guards against
/// infinite duplicate-keyword loops.
pub const NONE_KEYWORD: &str = "none";

/// A subgroup prepared for the next recursion level.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildChunk {
    /// Global sentence indices of the subgroup, in document order
    pub indices: Vec<usize>,
    /// Minted node name (marker-suffixed when abstract), or the sentinel
    pub keyword: String,
}

impl ChildChunk {
    /// Whether this child was assigned the sentinel keyword.
    pub fn is_skipped(&self) -> bool {
        self.keyword == NONE_KEYWORD
    }
}

/// Everything minted while assembling one level.
#[derive(Debug, Default)]
pub struct AssembledLevel {
    /// Representative keyword nodes, one per claimable subgroup
    pub nodes: Vec<Node>,
    /// Edges from the parent keyword node to each representative
    pub edges: Vec<Edge>,
    /// Child descriptors for the next recursion level
    pub children: Vec<ChildChunk>,
}

/// Assembles subgroup partitions into graph components.
pub struct GraphAssembler {
    leaf_token_limit: usize,
}

impl GraphAssembler {
    /// Create an assembler using the chunker's termination policy.
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            leaf_token_limit: config.leaf_token_limit,
        }
    }

    /// Mint nodes, edges, and child descriptors for the given subgroups.
    ///
    /// Each subgroup is one TF-IDF document; the first ranked candidate
    /// not yet in the registry becomes its representative keyword. A
    /// subgroup whose candidates are all claimed gets the sentinel
    /// keyword and contributes no node or edge.
    pub fn assemble(
        &self,
        subgroups: &[Vec<usize>],
        parent_name: &str,
        sentences: &[Sentence],
        source_id: &str,
        registry: &mut NameRegistry,
    ) -> AssembledLevel {
        let token_docs: Vec<Vec<String>> = subgroups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .flat_map(|&i| sentences[i].tokens.iter().cloned())
                    .collect()
            })
            .collect();
        let tfidf = TfIdf::from_token_docs(&token_docs);

        let mut level = AssembledLevel::default();
        for (doc, group) in subgroups.iter().enumerate() {
            let keyword = tfidf
                .ranked_terms(doc)
                .into_iter()
                .map(|(term, _)| term)
                .find(|term| registry.claim(term));

            let Some(keyword) = keyword else {
                debug!(subgroup = doc, "no unclaimed keyword, skipping branch");
                level.children.push(ChildChunk {
                    indices: group.clone(),
                    keyword: NONE_KEYWORD.to_string(),
                });
                continue;
            };

            // Small subgroups keep their literal sentences as description;
            // larger ones become abstract hubs and are decomposed further.
            let node = if token_docs[doc].len() < self.leaf_token_limit {
                let texts: Vec<&str> = group
                    .iter()
                    .map(|&i| sentences[i].raw_text.as_str())
                    .collect();
                Node::concrete(&keyword, source_id, &texts)
            } else {
                Node::abstract_hub(&keyword, source_id)
            };

            level.edges.push(Edge::related(parent_name, &node.name));
            level.children.push(ChildChunk {
                indices: group.clone(),
                keyword: node.name.clone(),
            });
            level.nodes.push(node);
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, tokens: &[&str]) -> Sentence {
        Sentence::new(
            index,
            tokens.iter().map(|t| t.to_string()).collect(),
            format!("sentence {}", index),
        )
    }

    fn assembler() -> GraphAssembler {
        GraphAssembler::new(&ChunkingConfig::default())
    }

    #[test]
    fn test_each_subgroup_gets_distinct_keyword() {
        let sentences = vec![
            sentence(0, &["market", "trade"]),
            sentence(1, &["protein", "cell"]),
        ];
        let mut registry = NameRegistry::new();
        let level = assembler().assemble(
            &[vec![0], vec![1]],
            "root*",
            &sentences,
            "doc-1",
            &mut registry,
        );

        assert_eq!(level.nodes.len(), 2);
        assert_eq!(level.children.len(), 2);
        assert_ne!(level.children[0].keyword, level.children[1].keyword);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_small_subgroup_is_concrete() {
        let sentences = vec![sentence(0, &["market", "trade"])];
        let mut registry = NameRegistry::new();
        let level =
            assembler().assemble(&[vec![0]], "root*", &sentences, "doc-1", &mut registry);

        assert_eq!(level.nodes.len(), 1);
        assert!(!level.nodes[0].is_abstract());
        assert_eq!(level.nodes[0].descriptions[0].description, "sentence 0");
        assert!(!level.children[0].keyword.ends_with('*'));
    }

    #[test]
    fn test_large_subgroup_is_abstract() {
        // 16 tokens >= the leaf limit of 15.
        let tokens: Vec<String> = (0..16).map(|i| format!("term{}", i)).collect();
        let token_refs: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
        let sentences = vec![sentence(0, &token_refs)];
        let mut registry = NameRegistry::new();
        let level =
            assembler().assemble(&[vec![0]], "root*", &sentences, "doc-1", &mut registry);

        assert_eq!(level.nodes.len(), 1);
        assert!(level.nodes[0].is_abstract());
        assert!(level.children[0].keyword.ends_with('*'));
        assert!(level.nodes[0].descriptions[0].description.is_empty());
    }

    #[test]
    fn test_edges_point_from_parent() {
        let sentences = vec![sentence(0, &["market"])];
        let mut registry = NameRegistry::new();
        let level =
            assembler().assemble(&[vec![0]], "root*", &sentences, "doc-1", &mut registry);

        assert_eq!(level.edges.len(), 1);
        assert_eq!(level.edges[0].source, "root*");
        assert_eq!(level.edges[0].target, level.children[0].keyword);
    }

    #[test]
    fn test_exhausted_candidates_get_sentinel() {
        let sentences = vec![sentence(0, &["market"]), sentence(1, &["market"])];
        let mut registry = NameRegistry::new();
        registry.claim("market");

        let level = assembler().assemble(
            &[vec![0], vec![1]],
            "root*",
            &sentences,
            "doc-1",
            &mut registry,
        );

        // "market" is already claimed everywhere: both subgroups skip.
        assert!(level.nodes.is_empty());
        assert!(level.edges.is_empty());
        assert_eq!(level.children.len(), 2);
        assert!(level.children.iter().all(ChildChunk::is_skipped));
    }

    #[test]
    fn test_duplicate_keyword_across_siblings_claimed_once() {
        let sentences = vec![
            sentence(0, &["market", "trade"]),
            sentence(1, &["market", "policy"]),
        ];
        let mut registry = NameRegistry::new();
        let level = assembler().assemble(
            &[vec![0], vec![1]],
            "root*",
            &sentences,
            "doc-1",
            &mut registry,
        );

        // Both subgroups rank "market" equally distinctive at best, but
        // only one may own it; the other falls back to its next term.
        assert_eq!(level.nodes.len(), 2);
        let names: Vec<&str> = level.nodes.iter().map(|n| n.label.as_str()).collect();
        assert!(names.contains(&"trade") || names.contains(&"policy"));
    }

    #[test]
    fn test_children_align_with_subgroups() {
        let sentences = vec![
            sentence(0, &["market"]),
            sentence(1, &[]),
            sentence(2, &["protein"]),
        ];
        let mut registry = NameRegistry::new();
        let subgroups = vec![vec![0], vec![1], vec![2]];
        let level =
            assembler().assemble(&subgroups, "root*", &sentences, "doc-1", &mut registry);

        // One child per subgroup, in order, even when the middle one has
        // no tokens at all.
        assert_eq!(level.children.len(), 3);
        assert_eq!(level.children[0].indices, vec![0]);
        assert!(level.children[1].is_skipped());
        assert_eq!(level.children[2].indices, vec![2]);
    }
}
