//! Terminal phrase extraction configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the terminal phrase-extraction pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseConfig {
    /// Maximum phrase nodes minted per leaf chunk
    #[serde(default = "default_max_phrase_nodes")]
    pub max_phrase_nodes: usize,

    /// Pairwise similarity every cluster member must reach with every
    /// other member
    #[serde(default = "default_clique_threshold")]
    pub clique_threshold: f32,

    /// Maximum auto-linked children per cluster
    #[serde(default = "default_max_cluster_children")]
    pub max_cluster_children: usize,

    /// Maximum shared occurrence sentences turned into relation edges
    /// between two linked nodes
    #[serde(default = "default_max_relation_sentences")]
    pub max_relation_sentences: usize,

    /// Maximum occurrence sentences kept as a node's description
    #[serde(default = "default_max_description_sentences")]
    pub max_description_sentences: usize,

    /// Concurrent phrase-embedding tasks
    #[serde(default = "default_embed_concurrency")]
    pub embed_concurrency: usize,
}

fn default_max_phrase_nodes() -> usize {
    5
}
fn default_clique_threshold() -> f32 {
    0.98
}
fn default_max_cluster_children() -> usize {
    5
}
fn default_max_relation_sentences() -> usize {
    4
}
fn default_max_description_sentences() -> usize {
    5
}
fn default_embed_concurrency() -> usize {
    4
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            max_phrase_nodes: default_max_phrase_nodes(),
            clique_threshold: default_clique_threshold(),
            max_cluster_children: default_max_cluster_children(),
            max_relation_sentences: default_max_relation_sentences(),
            max_description_sentences: default_max_description_sentences(),
            embed_concurrency: default_embed_concurrency(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhraseConfig::default();
        assert_eq!(config.max_phrase_nodes, 5);
        assert!((config.clique_threshold - 0.98).abs() < f32::EPSILON);
        assert_eq!(config.embed_concurrency, 4);
    }
}
