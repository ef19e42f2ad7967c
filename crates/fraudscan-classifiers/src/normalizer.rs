//! Text normalization pipeline
//!
//! Converts raw posting text into the canonical token string the vectorizers
//! were fitted on. The steps run in a fixed order:
//!
//! 1. lowercase
//! 2. drop every character that is neither a word character nor whitespace
//!    (word characters are letters, numbers and `_`; combining marks are
//!    dropped and the information separators U+001C..U+001F count as
//!    whitespace)
//! 3. collapse whitespace and trim
//! 4. tokenize
//! 5. drop stop words, lemmatize the remaining tokens as nouns
//! 6. join with single spaces
//!
//! Feature vectors are only comparable with the training data when inference
//! text goes through exactly this pipeline.

use crate::lemmatizer::Lemmatizer;
use crate::stopwords::StopWords;
use crate::tokenizer::Tokenizer;
use fraudscan_core::{Error, Result};
use regex::Regex;

/// Deterministic text normalizer
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    punctuation: Regex,
    whitespace: Regex,
    tokenizer: Tokenizer,
    stop_words: StopWords,
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    /// Create a normalizer from its components
    pub fn new(stop_words: StopWords, lemmatizer: Lemmatizer) -> Result<Self> {
        Ok(Self {
            punctuation: Regex::new(r"[^\p{L}\p{N}_\s\x1C-\x1F]")
                .map_err(|e| Error::internal(format!("Failed to compile punctuation regex: {}", e)))?,
            whitespace: Regex::new(r"[\s\x1C-\x1F]+")
                .map_err(|e| Error::internal(format!("Failed to compile whitespace regex: {}", e)))?,
            tokenizer: Tokenizer::new(),
            stop_words,
            lemmatizer,
        })
    }

    /// English stop words with the given lemmatizer
    pub fn english(lemmatizer: Lemmatizer) -> Result<Self> {
        Self::new(StopWords::english(), lemmatizer)
    }

    /// Normalize raw text; absent text normalizes to the empty string
    pub fn normalize(&self, text: Option<&str>) -> String {
        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ => return String::new(),
        };

        let lowered = text.to_lowercase();
        let stripped = self.punctuation.replace_all(&lowered, "");
        let collapsed = self.whitespace.replace_all(&stripped, " ");

        self.tokenizer
            .tokenize(collapsed.trim())
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .map(|token| self.lemmatizer.lemmatize(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        let wordnet = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/wordnet");
        TextNormalizer::english(Lemmatizer::from_wordnet_dir(wordnet).unwrap()).unwrap()
    }

    #[test]
    fn test_total_over_degenerate_input() {
        let n = normalizer();
        assert_eq!(n.normalize(None), "");
        assert_eq!(n.normalize(Some("")), "");
        assert_eq!(n.normalize(Some("!!! ... ?? $$$ %^&*()")), "");
        assert_eq!(n.normalize(Some("   \t\n ")), "");
    }

    #[test]
    fn test_sample_fraud_posting() {
        let n = normalizer();
        let cleaned = n.normalize(Some(
            "Earn $5000/week working from home, no experience needed!!!",
        ));

        assert_eq!(cleaned, "earn 5000week working home experience needed");
        assert!(cleaned.chars().all(|c| c.is_alphanumeric() || c == ' ' || c == '_'));
        let tokens: Vec<&str> = cleaned.split(' ').collect();
        assert!(!tokens.contains(&"no"));
        assert!(!tokens.contains(&"from"));
    }

    #[test]
    fn test_lemmatizes_plural_nouns() {
        let n = normalizer();
        assert_eq!(
            n.normalize(Some("Multiple Opportunities for Data-Entry Clerks")),
            "multiple opportunity dataentry clerk"
        );
    }

    #[test]
    fn test_keeps_underscores_and_unicode_letters() {
        let n = normalizer();
        assert_eq!(n.normalize(Some("Café_manager — Zürich!")), "café_manager zürich");
    }

    #[test]
    fn test_word_characters_follow_unicode_categories() {
        let n = normalizer();
        // combining acute accent is not a word character
        assert_eq!(n.normalize(Some("cafe\u{301} engineer")), "cafe engineer");
        // superscripts and vulgar fractions are numbers
        assert_eq!(n.normalize(Some("x² ½ salary")), "x² ½ salary");
        // information separators split words
        assert_eq!(n.normalize(Some("team\u{1c}kit\u{1f}fee")), "team kit fee");
    }

    #[test]
    fn test_fused_forms_are_split_before_stop_words() {
        let n = normalizer();
        // "can" and "not" are stop words once "cannot" is split
        assert_eq!(n.normalize(Some("You cannot lose")), "lose");
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let n = normalizer();
        let inputs = [
            "We are seeking an experienced data scientist for a salaried position.",
            "entry. data entry work customer service skill position home",
            "URGENT!!! Wire $200 for the starter kit...",
        ];

        for input in inputs {
            let once = n.normalize(Some(input));
            assert_eq!(once, n.normalize(Some(input)));
            assert_eq!(n.normalize(Some(&once)), once, "not idempotent for {input:?}");
        }
    }
}
