//! Depth-bounded recursive chunking.
//!
//! The walk is single-threaded, depth-first, and synchronous. The topic
//! model is fit exactly once, at the root; every deeper level reuses the
//! same similarity matrix with a threshold escalated by a fixed growth
//! factor per level.

use tracing::{debug, error, info};

use graph_topics::{SimilarityMatrix, TopicEstimator, TopicModelConfig};
use graph_types::{Edge, LeafChunk, Node, Sentence};

use crate::assembler::GraphAssembler;
use crate::config::ChunkingConfig;
use crate::error::ChunkingError;
use crate::grouper::{group_consecutive, overflow_split};
use crate::registry::NameRegistry;

/// Base threshold used when the matrix is too small to take a quantile.
const FALLBACK_BASE_THRESHOLD: f32 = 0.5;

/// Terminal action decided for a chunk at a given depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Trivial content: emit nothing, do not descend
    TooSmall,
    /// Depth cap with manageable size: emit the chunk as a leaf
    DepthCapReached,
    /// Depth cap but still too large: take the fallback splitter
    DepthCapOverflow,
    /// No terminal condition met: split and recurse
    Continue,
}

/// Everything produced by one chunking run.
pub struct ChunkingOutcome {
    /// Backbone keyword nodes, root first
    pub nodes: Vec<Node>,
    /// Backbone edges
    pub edges: Vec<Edge>,
    /// Finalized leaf chunks for the terminal phrase-extraction pass
    pub leaves: Vec<LeafChunk>,
    /// Name registry carrying every minted keyword, shared with the
    /// terminal pass for document-wide deduplication
    pub registry: NameRegistry,
    /// Name of the document root node (marker-suffixed)
    pub root_name: String,
}

/// The recursive chunker.
pub struct RecursiveChunker {
    config: ChunkingConfig,
    estimator: TopicEstimator,
}

/// Read-only state shared by every level of one walk.
struct Walk<'a> {
    sentences: &'a [Sentence],
    similarity: &'a SimilarityMatrix,
    source_id: &'a str,
    assembler: GraphAssembler,
}

/// Mutable accumulators threaded through the walk.
#[derive(Default)]
struct Accumulator {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    leaves: Vec<LeafChunk>,
}

impl RecursiveChunker {
    /// Create a chunker with explicit chunking and topic model settings.
    pub fn new(config: ChunkingConfig, topic_config: TopicModelConfig) -> Self {
        Self {
            config,
            estimator: TopicEstimator::new(topic_config),
        }
    }

    /// Create a chunker with default settings.
    pub fn with_defaults() -> Self {
        Self::new(ChunkingConfig::default(), TopicModelConfig::default())
    }

    /// Decide the terminal action for a chunk.
    ///
    /// Trivial size wins over the depth cap: content at or under the leaf
    /// token limit is pruned no matter how deep the walk is.
    pub fn check_termination(&self, token_count: usize, depth: usize) -> Termination {
        if token_count <= self.config.leaf_token_limit {
            return Termination::TooSmall;
        }
        if depth >= self.config.max_depth {
            if token_count > self.config.overflow_token_limit {
                return Termination::DepthCapOverflow;
            }
            return Termination::DepthCapReached;
        }
        Termination::Continue
    }

    /// Run the full recursive decomposition of a document.
    ///
    /// Fails closed on topic model failure; the caller must treat that as
    /// a hard stop and return an empty graph for the document.
    pub fn run(
        &self,
        sentences: &[Sentence],
        source_id: &str,
    ) -> Result<ChunkingOutcome, ChunkingError> {
        let estimate = self.estimator.estimate(sentences)?;

        let mut registry = NameRegistry::new();
        registry.claim(&estimate.top_keyword);
        let root = Node::abstract_hub(&estimate.top_keyword, source_id);
        let root_name = root.name.clone();

        let base_threshold = estimate
            .similarity
            .upper_triangle_quantile(self.config.base_quantile)
            .unwrap_or(FALLBACK_BASE_THRESHOLD);
        info!(
            sentences = sentences.len(),
            root = %root_name,
            base_threshold,
            "starting recursive chunking"
        );

        let walk = Walk {
            sentences,
            similarity: &estimate.similarity,
            source_id,
            assembler: GraphAssembler::new(&self.config),
        };
        let mut acc = Accumulator {
            nodes: vec![root],
            ..Default::default()
        };

        let indices: Vec<usize> = (0..sentences.len()).collect();
        self.descend(
            indices,
            root_name.clone(),
            0,
            base_threshold,
            &walk,
            &mut acc,
            &mut registry,
        );

        info!(
            nodes = acc.nodes.len(),
            edges = acc.edges.len(),
            leaves = acc.leaves.len(),
            "recursive chunking complete"
        );

        Ok(ChunkingOutcome {
            nodes: acc.nodes,
            edges: acc.edges,
            leaves: acc.leaves,
            registry,
            root_name,
        })
    }

    /// One level of the walk. Depth 0 is the root chunk and always
    /// splits; every deeper level checks termination first. The active
    /// threshold is the base escalated geometrically with depth.
    #[allow(clippy::too_many_arguments)]
    fn descend(
        &self,
        indices: Vec<usize>,
        keyword: String,
        depth: usize,
        base_threshold: f32,
        walk: &Walk<'_>,
        acc: &mut Accumulator,
        registry: &mut NameRegistry,
    ) {
        if depth > 0 {
            let token_count: usize = indices
                .iter()
                .map(|&i| walk.sentences[i].token_count())
                .sum();
            match self.check_termination(token_count, depth) {
                Termination::TooSmall => {
                    debug!(depth, token_count, "chunk pruned");
                    return;
                }
                Termination::DepthCapReached => {
                    debug!(depth, token_count, "depth cap, emitting leaf");
                    acc.leaves.push(LeafChunk::new(indices, keyword));
                    return;
                }
                Termination::DepthCapOverflow => {
                    // Degraded mode: pieces inherit the keyword unchanged.
                    let pieces = overflow_split(
                        &indices,
                        walk.similarity,
                        self.config.overflow_max_cuts,
                    );
                    debug!(depth, token_count, pieces = pieces.len(), "overflow leaves");
                    for piece in pieces {
                        acc.leaves.push(LeafChunk::new(piece, keyword.clone()));
                    }
                    return;
                }
                Termination::Continue => {}
            }
        }

        let subgroups = group_consecutive(
            &indices,
            walk.similarity,
            self.config.threshold_at(base_threshold, depth),
            self.config.soft_branching_limit,
        );
        let level = walk.assembler.assemble(
            &subgroups,
            &keyword,
            walk.sentences,
            walk.source_id,
            registry,
        );

        acc.nodes.extend(level.nodes);
        acc.edges.extend(level.edges);

        if level.children.len() < subgroups.len() {
            // Fewer derived keywords than subgroups: halt this branch,
            // keeping whatever siblings already produced.
            error!(
                children = level.children.len(),
                subgroups = subgroups.len(),
                depth,
                "keyword derivation mismatch, halting branch"
            );
            return;
        }

        for child in level.children {
            if child.is_skipped() {
                debug!(depth, "skipping branch with sentinel keyword");
                continue;
            }
            self.descend(
                child.indices,
                child.keyword,
                depth + 1,
                base_threshold,
                walk,
                acc,
                registry,
            );
        }
    }
}
