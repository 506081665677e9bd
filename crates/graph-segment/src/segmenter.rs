//! Rule-based sentence segmentation.
//!
//! Splitting proceeds in three steps:
//! 1. Newline handling: a line of 25 characters or less stands alone
//!    (headings and list items); longer lines are merged with the next,
//!    treating the newline as a soft wrap.
//! 2. Punctuation splitting within each merged line.
//! 3. List-marker stripping ("1. ", "a. ") and filtering of fragments
//!    with at most one real character.

use regex::Regex;
use tracing::debug;

use graph_types::Sentence;

use crate::phrases::PhraseTokenizer;

/// A line at or under this length is treated as a standalone heading.
const HEADING_MAX_CHARS: usize = 25;

/// Sentence segmenter over a pluggable phrase tokenizer.
pub struct Segmenter<T: PhraseTokenizer> {
    tokenizer: T,
    sentence_end: Regex,
    list_marker_split: Regex,
    list_marker: Regex,
}

impl<T: PhraseTokenizer> Segmenter<T> {
    /// Create a segmenter with the given phrase tokenizer.
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            // Split after terminal punctuation followed by whitespace.
            sentence_end: Regex::new(r"[.!?]\s+").unwrap(),
            // Split before a single alphanumeric list marker ("1. ", "a. ").
            list_marker_split: Regex::new(r"\s[0-9a-zA-Z]\.\s").unwrap(),
            list_marker: Regex::new(r"^[0-9a-zA-Z]\.\s+").unwrap(),
        }
    }

    /// Segment a document into sentences with candidate phrases attached.
    ///
    /// A sentence whose tokenizer output is empty falls back to a single
    /// token holding the whole sentence, so no sentence disappears from
    /// the downstream token accounting.
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        let fragments = self.split_sentences(text);

        let mut sentences = Vec::with_capacity(fragments.len());
        for (index, fragment) in fragments.into_iter().enumerate() {
            let mut tokens = self.tokenizer.phrases(&fragment);
            if tokens.is_empty() {
                debug!(index, "no phrases extracted, using whole sentence");
                tokens = vec![fragment.trim().to_string()];
            }
            sentences.push(Sentence::new(index, tokens, fragment));
        }
        sentences
    }

    /// Split raw text into sentence fragments.
    fn split_sentences(&self, text: &str) -> Vec<String> {
        let cleaned = text.trim();
        if cleaned.is_empty() {
            return Vec::new();
        }

        // Step 1: newline handling with the heading heuristic.
        let mut merged_lines: Vec<String> = Vec::new();
        let mut current = String::new();
        for line in cleaned.split('\n') {
            current.push_str(line);
            let stripped = current.trim();
            if stripped.is_empty() {
                current.clear();
                continue;
            }
            if stripped.chars().count() <= HEADING_MAX_CHARS {
                merged_lines.push(stripped.to_string());
                current.clear();
            } else {
                // Soft wrap: replace the newline with a space.
                current.push(' ');
            }
        }
        let last = current.trim();
        if !last.is_empty() {
            merged_lines.push(last.to_string());
        }

        // Step 2: punctuation splitting inside each merged line.
        let mut candidates: Vec<String> = Vec::new();
        for line in &merged_lines {
            candidates.extend(self.split_keeping_terminator(line));
        }

        // Step 3: list-marker handling and filtering.
        let mut final_sentences = Vec::new();
        for candidate in candidates {
            let candidate = candidate.trim();
            if candidate.is_empty() {
                continue;
            }
            for fragment in self.split_list_items(candidate) {
                let fragment = self.list_marker.replace(fragment.trim(), "");
                let fragment = fragment.trim();
                let real_chars = fragment.chars().filter(|c| c.is_alphanumeric()).count();
                if fragment.chars().count() <= 1 || real_chars <= 1 {
                    continue;
                }
                final_sentences.push(fragment.to_string());
            }
        }

        final_sentences
    }

    /// Split a line after terminal punctuation, keeping the punctuation
    /// with the preceding sentence.
    fn split_keeping_terminator(&self, line: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for m in self.sentence_end.find_iter(line) {
            // Keep the punctuation character, drop the trailing whitespace.
            let end = m.start() + 1;
            pieces.push(line[start..end].to_string());
            start = m.end();
        }
        if start < line.len() {
            pieces.push(line[start..].to_string());
        }
        pieces
    }

    /// Split a fragment before embedded list markers.
    fn split_list_items(&self, fragment: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut start = 0;
        for m in self.list_marker_split.find_iter(fragment) {
            pieces.push(fragment[start..m.start()].to_string());
            // Resume after the leading whitespace so the marker itself is
            // stripped by the caller's marker regex.
            start = m.start() + 1;
        }
        pieces.push(fragment[start..].to_string());
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::EnglishPhraseTokenizer;

    fn segmenter() -> Segmenter<EnglishPhraseTokenizer> {
        Segmenter::new(EnglishPhraseTokenizer::new())
    }

    #[test]
    fn test_splits_on_terminal_punctuation() {
        let sentences = segmenter().segment("Prices rose sharply. Wages stayed flat.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].raw_text, "Prices rose sharply.");
        assert_eq!(sentences[1].raw_text, "Wages stayed flat.");
    }

    #[test]
    fn test_indices_are_sequential() {
        let sentences = segmenter().segment("One market here. Two markets there. Three markets.");
        let indices: Vec<usize> = sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_short_line_is_standalone_heading() {
        let text = "Market Overview\nThe global economy expanded this quarter despite persistent inflation pressure.";
        let sentences = segmenter().segment(text);
        assert_eq!(sentences[0].raw_text, "Market Overview");
        assert!(sentences[1].raw_text.starts_with("The global economy"));
    }

    #[test]
    fn test_long_line_soft_wraps() {
        let text = "The global economy expanded this quarter despite inflation\npressure and tightening monetary policy across regions.";
        let sentences = segmenter().segment(text);
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].raw_text.contains("inflation pressure"));
    }

    #[test]
    fn test_list_markers_are_stripped() {
        let sentences = segmenter().segment("Key findings follow 1. inflation slowed 2. exports grew steadily");
        for s in &sentences {
            assert!(!s.raw_text.starts_with("1."), "marker kept: {}", s.raw_text);
            assert!(!s.raw_text.starts_with("2."), "marker kept: {}", s.raw_text);
        }
    }

    #[test]
    fn test_tiny_fragments_are_dropped() {
        let sentences = segmenter().segment("A. B. Prices rose sharply this year.");
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].raw_text.contains("Prices rose"));
    }

    #[test]
    fn test_empty_input() {
        assert!(segmenter().segment("").is_empty());
        assert!(segmenter().segment("   \n\n  ").is_empty());
    }

    #[test]
    fn test_sentence_without_phrases_falls_back_to_raw_text() {
        let sentences = segmenter().segment("It is so very much about that.");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].tokens.len(), 1);
        assert_eq!(sentences[0].tokens[0], "It is so very much about that.");
    }
}
