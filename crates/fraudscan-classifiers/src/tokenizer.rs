//! Treebank-style word tokenizer
//!
//! Input reaching the tokenizer has already been lowercased and stripped of
//! punctuation, so the only Treebank rules that can still fire are the ones
//! that split fused informal forms ("gonna" -> "gon na"). Everything else
//! reduces to splitting on whitespace.

/// Fused forms split into two tokens at a fixed offset.
///
/// Text is padded with a space on both sides before these rules run, so a
/// form at the very end of the text is split too.
const FUSED_FORMS: &[(&str, usize)] = &[
    ("cannot", 3),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("wanna", 3),
];

/// Word tokenizer matching the segmentation used when the vectorizers were fitted
#[derive(Debug, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Self
    }

    /// Split text into word tokens
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut tokens = Vec::new();

        for word in text.split_whitespace() {
            match split_fused(word) {
                Some((head, tail)) => {
                    tokens.push(head);
                    tokens.push(tail);
                }
                None => tokens.push(word),
            }
        }

        tokens
    }
}

fn split_fused(word: &str) -> Option<(&str, &str)> {
    FUSED_FORMS
        .iter()
        .find(|(form, _)| word == *form)
        .map(|(_, at)| word.split_at(*at))
}
