//! Similarity-based sentence grouping.
//!
//! Both entry points work on sentence indices in original document order
//! and consult the shared similarity matrix; neither ever recomputes it.

use tracing::{debug, warn};

use graph_topics::SimilarityMatrix;

/// Greedy consecutive merge: a new subgroup starts whenever the similarity
/// between two adjacent sentences falls below the active threshold.
///
/// When the chunk has more than `soft_branching_limit` sentences, the
/// active threshold is first tightened to the smaller of `threshold` and
/// the `soft_branching_limit - 1`-th smallest adjacent similarity. That
/// bounds the branching factor at one level to roughly the limit; it is
/// not an exact guarantee.
pub fn group_consecutive(
    indices: &[usize],
    similarity: &SimilarityMatrix,
    threshold: f32,
    soft_branching_limit: usize,
) -> Vec<Vec<usize>> {
    if indices.is_empty() {
        return Vec::new();
    }

    let mut active = threshold;
    if indices.len() > soft_branching_limit {
        let mut gaps = adjacent_similarities(indices, similarity);
        gaps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let cap = gaps[soft_branching_limit.saturating_sub(2).min(gaps.len() - 1)];
        if cap < active {
            debug!(threshold, cap, "tightened grouping threshold");
            active = cap;
        }
    }

    let mut groups = Vec::new();
    let mut current = vec![indices[0]];
    for pair in indices.windows(2) {
        if similarity.get(pair[1], pair[0]) >= active {
            current.push(pair[1]);
        } else {
            groups.push(std::mem::take(&mut current));
            current.push(pair[1]);
        }
    }
    groups.push(current);
    groups
}

/// Overflow fallback splitter for depth-capped chunks that are still too
/// large: cut at up to `max_cuts` positions chosen by lowest adjacent
/// similarity. Degraded mode; every piece inherits the parent's keyword
/// unchanged, sacrificing topic granularity to guarantee termination.
pub fn overflow_split(
    indices: &[usize],
    similarity: &SimilarityMatrix,
    max_cuts: usize,
) -> Vec<Vec<usize>> {
    if indices.len() < 2 || max_cuts == 0 {
        return vec![indices.to_vec()];
    }

    warn!(
        sentences = indices.len(),
        max_cuts, "overflow fallback split"
    );

    // Rank cut positions (the gap before position p) by ascending similarity.
    let gaps = adjacent_similarities(indices, similarity);
    let mut positions: Vec<usize> = (1..indices.len()).collect();
    positions.sort_by(|&a, &b| {
        gaps[a - 1]
            .partial_cmp(&gaps[b - 1])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut cuts: Vec<usize> = positions.into_iter().take(max_cuts).collect();
    cuts.sort_unstable();

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        pieces.push(indices[start..cut].to_vec());
        start = cut;
    }
    pieces.push(indices[start..].to_vec());
    pieces
}

/// Similarities of each adjacent index pair, in sequence order.
fn adjacent_similarities(indices: &[usize], similarity: &SimilarityMatrix) -> Vec<f32> {
    indices
        .windows(2)
        .map(|pair| similarity.get(pair[1], pair[0]))
        .collect()
}
