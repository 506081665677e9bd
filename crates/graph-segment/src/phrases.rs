//! Candidate-phrase extraction.
//!
//! Phrases are maximal runs of consecutive content words. They feed TF-IDF
//! keyword ranking during chunking and the phrase-node layer of the
//! terminal extraction pass.

/// Per-language phrase extraction seam.
pub trait PhraseTokenizer: Send + Sync {
    /// Extract candidate phrases from one sentence.
    fn phrases(&self, sentence: &str) -> Vec<String>;
}

/// English phrase tokenizer.
///
/// Lowercases, strips punctuation, and groups consecutive non-stopword
/// words into phrases. A phrase must be at least two characters long.
#[derive(Debug, Default, Clone)]
pub struct EnglishPhraseTokenizer;

impl EnglishPhraseTokenizer {
    /// Create a tokenizer.
    pub fn new() -> Self {
        Self
    }
}

impl PhraseTokenizer for EnglishPhraseTokenizer {
    fn phrases(&self, sentence: &str) -> Vec<String> {
        let mut phrases = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for raw_word in sentence.split_whitespace() {
            let word: String = raw_word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();

            // Punctuation-only words and stopwords end the current phrase.
            if word.len() > 1 && !is_stop_word(&word) {
                current.push(word);
            } else if !current.is_empty() {
                phrases.push(current.join(" "));
                current.clear();
            }

            // Trailing punctuation closes the phrase as well; a noun
            // phrase does not span a comma or clause boundary.
            let ends_with_punctuation = raw_word
                .chars()
                .last()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(false);
            if ends_with_punctuation && !current.is_empty() {
                phrases.push(current.join(" "));
                current.clear();
            }
        }

        if !current.is_empty() {
            phrases.push(current.join(" "));
        }

        phrases.retain(|p| p.len() >= 2);
        phrases
    }
}

/// Check if a word is a stop word.
fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "the", "an", "a", "and", "or", "but", "which", "they", "this", "that", "these", "those",
        "you", "me", "my", "your", "our", "their", "his", "her", "him", "she", "he", "we", "it",
        "its", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "can", "may", "might", "must", "of",
        "in", "on", "at", "to", "for", "with", "by", "from", "as", "into", "about", "than",
        "then", "there", "here", "when", "where", "how", "why", "what", "who", "not", "no",
        "so", "if", "also", "very", "just", "much",
    ];

    STOP_WORDS.contains(&word)
}
