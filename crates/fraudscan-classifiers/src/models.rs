//! Probabilistic classifiers over sparse features
//!
//! - `MultinomialNb`: per-class log prior plus log feature likelihoods,
//!   normalized with log-sum-exp.
//! - `LogisticRegression`: sigmoid over one coefficient row for binary
//!   problems, softmax over one row per class otherwise.
//!
//! Probabilities are returned indexed by class code. The predicted class is
//! the argmax of those probabilities, first index winning ties.

use crate::classifier::{Classifier, FeatureVector};
use fraudscan_core::{ClassCode, Error, Result};
use serde::{Deserialize, Serialize};

fn default_classes() -> Vec<ClassCode> {
    vec![0, 1]
}

/// Classes must be a permutation of `0..n` so probabilities can be indexed by code
fn check_classes(classes: &[ClassCode]) -> std::result::Result<(), String> {
    if classes.len() < 2 {
        return Err(format!("expected at least two classes, got {}", classes.len()));
    }
    let mut sorted = classes.to_vec();
    sorted.sort_unstable();
    if sorted.iter().enumerate().any(|(i, &c)| i != c) {
        return Err(format!("classes {:?} are not the codes 0..{}", classes, classes.len()));
    }
    Ok(())
}

fn check_rows(rows: &[Vec<f64>], what: &str) -> std::result::Result<usize, String> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if width == 0 {
        return Err(format!("{} is empty", what));
    }
    if rows.iter().any(|row| row.len() != width) {
        return Err(format!("{} rows have different lengths", what));
    }
    if rows.iter().flatten().any(|w| w.is_nan()) {
        return Err(format!("{} contains NaN", what));
    }
    Ok(width)
}

fn check_dim(features: &FeatureVector, expected: usize) -> Result<()> {
    if features.dim() != expected {
        return Err(Error::inference(format!(
            "feature vector has {} dimensions, classifier expects {}",
            features.dim(),
            expected
        )));
    }
    Ok(())
}

/// Softmax with max subtraction
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Index of the largest value, first one on ties
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

/// Reorder per-position probabilities into per-class-code order
fn by_class_code(classes: &[ClassCode], positional: Vec<f64>) -> Vec<f64> {
    let mut out = vec![0.0; classes.len()];
    for (class, p) in classes.iter().zip(positional) {
        out[*class] = p;
    }
    out
}

/// Serialized form of a multinomial naive Bayes model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNbParams {
    #[serde(default = "default_classes")]
    pub classes: Vec<ClassCode>,
    pub class_log_prior: Vec<f64>,
    /// One row of log P(feature | class) per class
    pub feature_log_prob: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct MultinomialNb {
    classes: Vec<ClassCode>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNb {
    pub fn from_params(params: MultinomialNbParams) -> std::result::Result<Self, String> {
        check_classes(&params.classes)?;
        let n_features = check_rows(&params.feature_log_prob, "feature_log_prob")?;

        let n_classes = params.classes.len();
        if params.class_log_prior.len() != n_classes || params.feature_log_prob.len() != n_classes {
            return Err(format!(
                "expected {} classes in class_log_prior and feature_log_prob",
                n_classes
            ));
        }

        Ok(Self {
            classes: params.classes,
            class_log_prior: params.class_log_prior,
            feature_log_prob: params.feature_log_prob,
            n_features,
        })
    }

    fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| prior + features.dot(row))
            .collect()
    }
}

impl Classifier for MultinomialNb {
    fn predict(&self, features: &FeatureVector) -> Result<ClassCode> {
        let proba = self.predict_proba(features)?;
        Ok(argmax(&proba))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        check_dim(features, self.n_features)?;
        let positional = softmax(&self.joint_log_likelihood(features));
        Ok(by_class_code(&self.classes, positional))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &str {
        "multinomial_nb"
    }
}

/// Serialized form of a logistic regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionParams {
    #[serde(default = "default_classes")]
    pub classes: Vec<ClassCode>,
    /// One row for binary models, one row per class otherwise
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<ClassCode>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
}

impl LogisticRegression {
    pub fn from_params(params: LogisticRegressionParams) -> std::result::Result<Self, String> {
        check_classes(&params.classes)?;
        let n_features = check_rows(&params.coef, "coef")?;

        let n_classes = params.classes.len();
        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if params.coef.len() != expected_rows {
            return Err(format!(
                "expected {} coefficient rows for {} classes, got {}",
                expected_rows,
                n_classes,
                params.coef.len()
            ));
        }
        if params.intercept.len() != expected_rows {
            return Err(format!(
                "expected {} intercepts, got {}",
                expected_rows,
                params.intercept.len()
            ));
        }

        Ok(Self {
            classes: params.classes,
            coef: params.coef,
            intercept: params.intercept,
            n_features,
        })
    }

    fn decision_function(&self, features: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| features.dot(row) + b)
            .collect()
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &FeatureVector) -> Result<ClassCode> {
        let proba = self.predict_proba(features)?;
        Ok(argmax(&proba))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        check_dim(features, self.n_features)?;
        let scores = self.decision_function(features);

        let positional = if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&scores)
        };

        Ok(by_class_code(&self.classes, positional))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &str {
        "logistic_regression"
    }
}
