//! Phrase occurrence map.
//!
//! Maps each candidate phrase of a leaf chunk to the set of local
//! sentence indices it appears in. Both maps and sets are ordered so
//! every traversal downstream of the parallel embedding barrier is
//! stable, keeping score computation reproducible.

use std::collections::{BTreeMap, BTreeSet};

/// Phrase -> local sentence indices, in stable order.
#[derive(Debug, Default, Clone)]
pub struct PhraseOccurrences {
    map: BTreeMap<String, BTreeSet<usize>>,
}

impl PhraseOccurrences {
    /// Build the map from per-sentence phrase lists.
    ///
    /// `phrase_lists[i]` holds the candidate phrases of local sentence `i`.
    pub fn from_phrase_lists(phrase_lists: &[Vec<String>]) -> Self {
        let mut map: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (index, phrases) in phrase_lists.iter().enumerate() {
            for phrase in phrases {
                map.entry(phrase.clone()).or_default().insert(index);
            }
        }
        Self { map }
    }

    /// Occurrence indices of a phrase.
    pub fn indices(&self, phrase: &str) -> Option<&BTreeSet<usize>> {
        self.map.get(phrase)
    }

    /// Whether the phrase occurs in the chunk.
    pub fn contains(&self, phrase: &str) -> bool {
        self.map.contains_key(phrase)
    }

    /// Iterate phrases with their occurrence sets, in phrase order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<usize>)> {
        self.map.iter()
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the chunk has no phrases at all.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|l| l.iter().map(|p| p.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_collects_indices_per_phrase() {
        let occurrences = PhraseOccurrences::from_phrase_lists(&lists(&[
            &["market", "trade"],
            &["market"],
            &["policy"],
        ]));

        assert_eq!(occurrences.len(), 3);
        let market: Vec<usize> = occurrences.indices("market").unwrap().iter().copied().collect();
        assert_eq!(market, vec![0, 1]);
        assert!(occurrences.contains("policy"));
        assert!(!occurrences.contains("absent"));
    }

    #[test]
    fn test_duplicate_in_same_sentence_counted_once() {
        let occurrences =
            PhraseOccurrences::from_phrase_lists(&lists(&[&["market", "market"]]));
        assert_eq!(occurrences.indices("market").unwrap().len(), 1);
    }

    #[test]
    fn test_iteration_is_sorted_by_phrase() {
        let occurrences = PhraseOccurrences::from_phrase_lists(&lists(&[&["zeta", "alpha"]]));
        let phrases: Vec<&String> = occurrences.iter().map(|(p, _)| p).collect();
        assert_eq!(phrases, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_empty() {
        let occurrences = PhraseOccurrences::from_phrase_lists(&[]);
        assert!(occurrences.is_empty());
    }
}
