//! # graph-phrases
//!
//! Terminal phrase extraction for finalized leaf chunks.
//!
//! While the chunking backbone works from topic-model output, this pass
//! works from the finer-grained candidate phrases attached to each
//! sentence: it scores phrases by embedding centrality, merges
//! near-duplicates into cliques, and mints the phrase-node layer that
//! attaches to the chunk's incoming keyword node.

pub mod builder;
pub mod config;
pub mod extractor;
pub mod grouper;
pub mod occurrences;
pub mod scorer;

pub use builder::{EdgeBuilder, NodeFactory};
pub use config::PhraseConfig;
pub use extractor::PhraseExtractor;
pub use grouper::{group_cliques, PhraseCluster};
pub use occurrences::PhraseOccurrences;
pub use scorer::{PhraseScorer, ScoredPhrase};
