//! Chunking configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the recursive chunker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Depth at which branches must take a terminal action
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Chunks at or under this token count are pruned, not recorded
    #[serde(default = "default_leaf_token_limit")]
    pub leaf_token_limit: usize,

    /// Token count above which a depth-capped chunk takes the fallback
    /// splitter instead of terminating in place
    #[serde(default = "default_overflow_token_limit")]
    pub overflow_token_limit: usize,

    /// Soft bound on children per level; chunks with more sentences than
    /// this get a tightened grouping threshold
    #[serde(default = "default_soft_branching_limit")]
    pub soft_branching_limit: usize,

    /// Multiplier applied to the threshold per recursion level
    #[serde(default = "default_threshold_growth")]
    pub threshold_growth: f32,

    /// Maximum cut positions for the overflow fallback splitter
    #[serde(default = "default_overflow_max_cuts")]
    pub overflow_max_cuts: usize,

    /// Quantile of the upper-triangular similarity values used as the
    /// base threshold at depth 0
    #[serde(default = "default_base_quantile")]
    pub base_quantile: f64,
}

fn default_max_depth() -> usize {
    5
}
fn default_leaf_token_limit() -> usize {
    15
}
fn default_overflow_token_limit() -> usize {
    500
}
fn default_soft_branching_limit() -> usize {
    10
}
fn default_threshold_growth() -> f32 {
    1.1
}
fn default_overflow_max_cuts() -> usize {
    5
}
fn default_base_quantile() -> f64 {
    0.25
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            leaf_token_limit: default_leaf_token_limit(),
            overflow_token_limit: default_overflow_token_limit(),
            soft_branching_limit: default_soft_branching_limit(),
            threshold_growth: default_threshold_growth(),
            overflow_max_cuts: default_overflow_max_cuts(),
            base_quantile: default_base_quantile(),
        }
    }
}

impl ChunkingConfig {
    /// The grouping threshold at a given depth: geometric escalation of
    /// the base by the growth factor per level.
    pub fn threshold_at(&self, base: f32, depth: usize) -> f32 {
        base * self.threshold_growth.powi(depth as i32)
    }
}
