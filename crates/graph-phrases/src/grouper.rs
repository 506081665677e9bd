//! Near-duplicate phrase grouping.
//!
//! Phrases whose centroids are almost identical are folded into one
//! cluster so the graph gets a single scored representative with the
//! rest attached as children.

use crate::scorer::ScoredPhrase;

/// One cluster of near-duplicate phrases.
///
/// Indices point into the scored-phrase slice the cluster was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseCluster {
    /// Highest-scoring member
    pub representative: usize,
    /// Remaining members, in score order
    pub members: Vec<usize>,
}

/// Group phrases into cliques by pairwise centroid similarity.
///
/// A phrase joins a cluster only if its similarity to *every* current
/// member is at or above the threshold (clique condition, not
/// nearest-neighbor chaining). Input must be sorted by score descending;
/// seeds are taken in that order, so the representative is always the
/// highest-scoring member. Singleton clusters are returned too.
pub fn group_cliques(scored: &[ScoredPhrase], threshold: f32) -> Vec<PhraseCluster> {
    let n = scored.len();
    let mut assigned = vec![false; n];
    let mut clusters = Vec::new();

    for seed in 0..n {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];

        for candidate in (seed + 1)..n {
            if assigned[candidate] {
                continue;
            }
            let joins = members.iter().all(|&member| {
                scored[candidate]
                    .centroid
                    .cosine_similarity(&scored[member].centroid)
                    >= threshold
            });
            if joins {
                assigned[candidate] = true;
                members.push(candidate);
            }
        }

        clusters.push(PhraseCluster {
            representative: members[0],
            members: members[1..].to_vec(),
        });
    }

    clusters
}
