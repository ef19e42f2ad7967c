//! Decoding artifact files into capability objects
//!
//! Artifacts are JSON documents tagged by `kind`. The cache hands raw bytes to
//! these functions and only ever sees the resulting trait objects.

use crate::classifier::{Classifier, Transformer};
use crate::models::{LogisticRegression, LogisticRegressionParams, MultinomialNb, MultinomialNbParams};
use crate::vectorizer::{CountVectorizer, CountVectorizerParams, TfidfVectorizer, TfidfVectorizerParams};
use fraudscan_core::ArtifactError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized transformer artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformerArtifact {
    CountVectorizer(CountVectorizerParams),
    TfidfVectorizer(TfidfVectorizerParams),
}

/// Serialized classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    MultinomialNb(MultinomialNbParams),
    LogisticRegression(LogisticRegressionParams),
}

impl TransformerArtifact {
    /// Build the transformer this artifact describes
    pub fn build(self, name: &str) -> Result<Arc<dyn Transformer>, ArtifactError> {
        let built: Arc<dyn Transformer> = match self {
            Self::CountVectorizer(params) => Arc::new(
                CountVectorizer::from_params(params).map_err(|reason| ArtifactError::invalid(name, reason))?,
            ),
            Self::TfidfVectorizer(params) => Arc::new(
                TfidfVectorizer::from_params(params).map_err(|reason| ArtifactError::invalid(name, reason))?,
            ),
        };
        Ok(built)
    }
}

impl ClassifierArtifact {
    /// Build the classifier this artifact describes
    pub fn build(self, name: &str) -> Result<Arc<dyn Classifier>, ArtifactError> {
        let built: Arc<dyn Classifier> = match self {
            Self::MultinomialNb(params) => Arc::new(
                MultinomialNb::from_params(params).map_err(|reason| ArtifactError::invalid(name, reason))?,
            ),
            Self::LogisticRegression(params) => Arc::new(
                LogisticRegression::from_params(params)
                    .map_err(|reason| ArtifactError::invalid(name, reason))?,
            ),
        };
        Ok(built)
    }
}

/// Decode a transformer artifact from raw bytes
pub fn decode_transformer(name: &str, bytes: &[u8]) -> Result<Arc<dyn Transformer>, ArtifactError> {
    let artifact: TransformerArtifact = serde_json::from_slice(bytes).map_err(|source| ArtifactError::Decode {
        name: name.to_string(),
        source,
    })?;
    artifact.build(name)
}

/// Decode a classifier artifact from raw bytes
pub fn decode_classifier(name: &str, bytes: &[u8]) -> Result<Arc<dyn Classifier>, ArtifactError> {
    let artifact: ClassifierArtifact = serde_json::from_slice(bytes).map_err(|source| ArtifactError::Decode {
        name: name.to_string(),
        source,
    })?;
    artifact.build(name)
}
