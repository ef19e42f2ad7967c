//! Artifact capability traits and feature vectors
//!
//! Loaded artifacts are only ever used through these two narrow traits, so
//! the rest of the crate does not depend on how a model was trained or
//! serialized.

use fraudscan_core::{ClassCode, Result};

/// Converts normalized text into a feature vector
pub trait Transformer: Send + Sync {
    /// Encode a single document
    fn transform(&self, text: &str) -> Result<FeatureVector>;

    /// Number of features produced
    fn dimension(&self) -> usize;

    /// Short description of the transformer kind
    fn kind(&self) -> &str;
}

/// Maps a feature vector to a class code and a probability distribution
pub trait Classifier: Send + Sync {
    /// Predicted class code
    fn predict(&self, features: &FeatureVector) -> Result<ClassCode>;

    /// Per-class probabilities indexed by class code, summing to 1.0
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;

    /// Number of input features expected
    fn n_features(&self) -> usize;

    /// Short description of the classifier kind
    fn kind(&self) -> &str;
}

/// Sparse feature vector with entries sorted by index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector from unsorted `(index, value)` pairs
    ///
    /// Duplicate indices are summed, zero values and out-of-range indices are
    /// dropped.
    pub fn from_pairs(dim: usize, pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = pairs.into_iter().filter(|(i, _)| *i < dim).collect();
        entries.sort_unstable_by_key(|(i, _)| *i);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|(_, v)| *v != 0.0);

        Self { dim, entries: merged }
    }

    /// An all-zero vector
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Non-zero entries in index order
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at an index (zero when absent)
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense weight row
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|(i, v)| weights.get(*i).copied().unwrap_or(0.0) * v)
            .sum()
    }

    /// Apply a function to every stored value
    pub fn map_values(&mut self, f: impl Fn(usize, f64) -> f64) {
        for (index, value) in &mut self.entries {
            *value = f(*index, *value);
        }
        self.entries.retain(|(_, v)| *v != 0.0);
    }

    /// Euclidean norm
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Sum of absolute values
    pub fn l1_norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v.abs()).sum()
    }

    /// Divide every value by `divisor` unless it is zero
    pub fn scale_down(&mut self, divisor: f64) {
        if divisor > 0.0 {
            self.map_values(|_, v| v / divisor);
        }
    }
}
