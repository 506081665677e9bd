//! TF-IDF (Term Frequency - Inverse Document Frequency) keyword ranking.
//!
//! Pure Rust implementation over pre-tokenized documents. During chunking
//! every sibling subgroup is one "document", so a subgroup's top terms are
//! the ones frequent in it and rare among its siblings.

use std::collections::{HashMap, HashSet};

/// TF-IDF calculator over a corpus of token-list documents.
pub struct TfIdf {
    /// Term -> document count (how many documents contain this term)
    doc_frequencies: HashMap<String, usize>,
    /// Per-document term counts
    doc_terms: Vec<HashMap<String, usize>>,
    /// Per-document total token counts
    doc_lengths: Vec<usize>,
}

impl TfIdf {
    /// Build the calculator from pre-tokenized documents.
    ///
    /// An empty corpus or all-empty documents is not an error; every
    /// ranking is simply empty.
    pub fn from_token_docs(documents: &[Vec<String>]) -> Self {
        let mut doc_frequencies: HashMap<String, usize> = HashMap::new();
        let mut doc_terms = Vec::with_capacity(documents.len());
        let mut doc_lengths = Vec::with_capacity(documents.len());

        for tokens in documents {
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *doc_frequencies.entry(term.clone()).or_insert(0) += 1;
            }

            let mut counts: HashMap<String, usize> = HashMap::new();
            for term in tokens {
                *counts.entry(term.clone()).or_insert(0) += 1;
            }
            doc_terms.push(counts);
            doc_lengths.push(tokens.len());
        }

        Self {
            doc_frequencies,
            doc_terms,
            doc_lengths,
        }
    }

    /// Number of documents in the corpus.
    pub fn doc_count(&self) -> usize {
        self.doc_terms.len()
    }

    /// TF-IDF score of a term within one document.
    ///
    /// TF = count in document / document length;
    /// IDF = smoothed, `ln((N + 1) / (df + 1)) + 1`.
    pub fn score(&self, doc: usize, term: &str) -> f32 {
        let counts = match self.doc_terms.get(doc) {
            Some(counts) => counts,
            None => return 0.0,
        };
        let count = *counts.get(term).unwrap_or(&0) as f32;
        let len = self.doc_lengths[doc] as f32;
        if count == 0.0 || len == 0.0 {
            return 0.0;
        }
        let tf = count / len;
        tf * self.inverse_document_frequency(term)
    }

    fn inverse_document_frequency(&self, term: &str) -> f32 {
        let df = *self.doc_frequencies.get(term).unwrap_or(&0) as f32;
        if df == 0.0 {
            return 0.0;
        }
        let n = self.doc_count() as f32;
        ((n + 1.0) / (df + 1.0)).ln() + 1.0
    }

    /// All terms of one document ranked by TF-IDF score, descending.
    ///
    /// Zero-score terms are excluded. Ties resolve lexicographically so
    /// the ranking is stable across runs.
    pub fn ranked_terms(&self, doc: usize) -> Vec<(String, f32)> {
        let counts = match self.doc_terms.get(doc) {
            Some(counts) => counts,
            None => return Vec::new(),
        };

        let mut scores: Vec<(String, f32)> = counts
            .keys()
            .map(|term| (term.clone(), self.score(doc, term)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scores
    }

    /// Term -> score map for one document (zero-score terms excluded).
    pub fn doc_scores(&self, doc: usize) -> HashMap<String, f32> {
        self.ranked_terms(doc).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_distinctive_term_outranks_shared_term() {
        let corpus = docs(&[
            &["market", "trade", "trade"],
            &["market", "protein"],
            &["market", "cell"],
        ]);
        let tfidf = TfIdf::from_token_docs(&corpus);

        // "trade" is unique to doc 0 and repeated; "market" appears everywhere.
        let ranked = tfidf.ranked_terms(0);
        assert_eq!(ranked[0].0, "trade");
    }

    #[test]
    fn test_ranked_terms_descending() {
        let corpus = docs(&[&["alpha", "alpha", "beta", "gamma"], &["beta", "gamma"]]);
        let tfidf = TfIdf::from_token_docs(&corpus);
        let ranked = tfidf.ranked_terms(0);
        for pair in ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_score_absent_term_is_zero() {
        let corpus = docs(&[&["market"]]);
        let tfidf = TfIdf::from_token_docs(&corpus);
        assert_eq!(tfidf.score(0, "nonexistent"), 0.0);
    }

    #[test]
    fn test_empty_document_ranking_is_empty() {
        let corpus = docs(&[&[], &["market"]]);
        let tfidf = TfIdf::from_token_docs(&corpus);
        assert!(tfidf.ranked_terms(0).is_empty());
        assert!(!tfidf.ranked_terms(1).is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let tfidf = TfIdf::from_token_docs(&[]);
        assert_eq!(tfidf.doc_count(), 0);
        assert!(tfidf.ranked_terms(0).is_empty());
    }

    #[test]
    fn test_tie_break_is_lexicographic() {
        let corpus = docs(&[&["zeta", "alpha"]]);
        let tfidf = TfIdf::from_token_docs(&corpus);
        let ranked = tfidf.ranked_terms(0);
        assert_eq!(ranked[0].0, "alpha");
        assert_eq!(ranked[1].0, "zeta");
    }

    #[test]
    fn test_doc_scores_matches_ranking() {
        let corpus = docs(&[&["market", "trade"], &["market"]]);
        let tfidf = TfIdf::from_token_docs(&corpus);
        let scores = tfidf.doc_scores(0);
        assert_eq!(scores.len(), 2);
        assert!((scores["trade"] - tfidf.score(0, "trade")).abs() < f32::EPSILON);
    }
}
