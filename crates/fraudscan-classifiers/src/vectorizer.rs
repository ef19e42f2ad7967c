//! Bag-of-words and TF-IDF vectorizers
//!
//! Both re-analyse the normalized text the way the fitting pipeline did:
//! optional lowercasing, a token regex (default keeps runs of two or more
//! word characters) and word n-grams over the resulting tokens.

use crate::classifier::{FeatureVector, Transformer};
use fraudscan_core::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

/// Analyzer settings shared by both vectorizers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerParams {
    /// Token regex
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    /// Inclusive word n-gram range
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default = "default_true")]
    pub lowercase: bool,
}

impl Default for AnalyzerParams {
    fn default() -> Self {
        Self {
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            lowercase: true,
        }
    }
}

/// Splits a document into vocabulary terms
#[derive(Debug, Clone)]
pub struct Analyzer {
    token_pattern: Regex,
    min_n: usize,
    max_n: usize,
    lowercase: bool,
}

impl Analyzer {
    pub fn new(params: &AnalyzerParams) -> std::result::Result<Self, String> {
        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }

        let token_pattern = Regex::new(&params.token_pattern)
            .map_err(|e| format!("invalid token_pattern: {}", e))?;

        Ok(Self {
            token_pattern,
            min_n,
            max_n,
            lowercase: params.lowercase,
        })
    }

    /// Terms of a document in order, n-grams after unigrams
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self.token_pattern.find_iter(&text).map(|m| m.as_str()).collect();
        let mut terms = Vec::new();

        for n in self.min_n..=self.max_n {
            if n == 1 {
                terms.extend(tokens.iter().map(|t| t.to_string()));
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }

        terms
    }
}

fn check_vocabulary(vocabulary: &HashMap<String, usize>) -> std::result::Result<(), String> {
    let dim = vocabulary.len();
    let mut seen = vec![false; dim];
    for (term, &index) in vocabulary {
        if index >= dim {
            return Err(format!("vocabulary index {} for '{}' out of range {}", index, term, dim));
        }
        if std::mem::replace(&mut seen[index], true) {
            return Err(format!("vocabulary index {} assigned twice", index));
        }
    }
    Ok(())
}

fn count_terms(
    analyzer: &Analyzer,
    vocabulary: &HashMap<String, usize>,
    text: &str,
    binary: bool,
) -> FeatureVector {
    let pairs = analyzer
        .analyze(text)
        .into_iter()
        .filter_map(|term| vocabulary.get(&term).map(|&index| (index, 1.0)));

    let mut counts = FeatureVector::from_pairs(vocabulary.len(), pairs);
    if binary {
        counts.map_values(|_, _| 1.0);
    }
    counts
}

/// Serialized form of a bag-of-words vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizerParams {
    pub vocabulary: HashMap<String, usize>,

    #[serde(flatten)]
    pub analyzer: AnalyzerParams,

    /// Emit 1.0 for present terms instead of counts
    #[serde(default)]
    pub binary: bool,
}

/// Term-count encoder
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    vocabulary: HashMap<String, usize>,
    analyzer: Analyzer,
    binary: bool,
}

impl CountVectorizer {
    pub fn from_params(params: CountVectorizerParams) -> std::result::Result<Self, String> {
        check_vocabulary(&params.vocabulary)?;
        Ok(Self {
            analyzer: Analyzer::new(&params.analyzer)?,
            vocabulary: params.vocabulary,
            binary: params.binary,
        })
    }
}

impl Transformer for CountVectorizer {
    fn transform(&self, text: &str) -> Result<FeatureVector> {
        Ok(count_terms(&self.analyzer, &self.vocabulary, text, self.binary))
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn kind(&self) -> &str {
        "count_vectorizer"
    }
}

/// Row normalization applied after IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Serialized form of a TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizerParams {
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per vocabulary index
    pub idf: Vec<f64>,

    #[serde(flatten)]
    pub analyzer: AnalyzerParams,

    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    /// Replace tf with 1 + ln(tf)
    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default)]
    pub binary: bool,
}

/// TF-IDF encoder
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    analyzer: Analyzer,
    norm: Option<Norm>,
    sublinear_tf: bool,
    binary: bool,
}

impl TfidfVectorizer {
    pub fn from_params(params: TfidfVectorizerParams) -> std::result::Result<Self, String> {
        check_vocabulary(&params.vocabulary)?;
        if params.idf.len() != params.vocabulary.len() {
            return Err(format!(
                "idf has {} entries for a vocabulary of {}",
                params.idf.len(),
                params.vocabulary.len()
            ));
        }
        if params.idf.iter().any(|w| !w.is_finite()) {
            return Err("idf contains non-finite weights".to_string());
        }

        Ok(Self {
            analyzer: Analyzer::new(&params.analyzer)?,
            vocabulary: params.vocabulary,
            idf: params.idf,
            norm: params.norm,
            sublinear_tf: params.sublinear_tf,
            binary: params.binary,
        })
    }
}

impl Transformer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<FeatureVector> {
        let mut features = count_terms(&self.analyzer, &self.vocabulary, text, self.binary);

        if self.sublinear_tf {
            features.map_values(|_, tf| 1.0 + tf.ln());
        }
        features.map_values(|i, tf| tf * self.idf[i]);

        match self.norm {
            Some(Norm::L2) => {
                let norm = features.l2_norm();
                features.scale_down(norm);
            }
            Some(Norm::L1) => {
                let norm = features.l1_norm();
                features.scale_down(norm);
            }
            None => {}
        }

        Ok(features)
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn kind(&self) -> &str {
        "tfidf_vectorizer"
    }
}
