//! Model registry: the closed table of servable model identifiers

use fraudscan_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Identifier -> artifact filenames, fixed at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRegistry {
    #[serde(default = "default_version")]
    pub version: String,
    pub models: BTreeMap<String, ModelEntry>,
}

/// Artifact files backing one model identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Classifier artifact filename
    pub model: String,

    /// Vectorizer artifact filename, possibly shared with other identifiers
    pub vectorizer: String,

    #[serde(default)]
    pub description: String,
}

impl ModelEntry {
    pub fn new(model: impl Into<String>, vectorizer: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            vectorizer: vectorizer.into(),
            description: String::new(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

const BUILTIN_MODELS: &[(&str, &str, &str, &str)] = &[
    ("nb_bow", "nb_model_bow.json", "bow_vectorizer.json", "Naive Bayes, bag of words"),
    ("nb_bow_res", "nb_model_bow_res.json", "bow_vectorizer.json", "Naive Bayes, bag of words, resampled"),
    ("nb_tfidf", "nb_model_tfidf.json", "tfidf_vectorizer.json", "Naive Bayes, TF-IDF"),
    ("nb_tfidf_res", "nb_model_tfidf_res.json", "tfidf_vectorizer.json", "Naive Bayes, TF-IDF, resampled"),
    ("lr_bow", "lr_model_bow.json", "bow_vectorizer.json", "Logistic regression, bag of words"),
    ("lr_bow_res", "lr_model_bow_res.json", "bow_vectorizer.json", "Logistic regression, bag of words, resampled"),
    ("lr_tfidf", "lr_model_tfidf.json", "tfidf_vectorizer.json", "Logistic regression, TF-IDF"),
    ("lr_tfidf_res", "lr_model_tfidf_res.json", "tfidf_vectorizer.json", "Logistic regression, TF-IDF, resampled"),
];

impl ModelRegistry {
    /// The default table of trained models
    pub fn builtin() -> Self {
        let models = BUILTIN_MODELS
            .iter()
            .map(|(id, model, vectorizer, description)| {
                (
                    id.to_string(),
                    ModelEntry {
                        model: model.to_string(),
                        vectorizer: vectorizer.to_string(),
                        description: description.to_string(),
                    },
                )
            })
            .collect();

        Self {
            version: default_version(),
            models,
        }
    }

    /// Build a registry from `(identifier, entry)` pairs
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ModelEntry)>,
        S: Into<String>,
    {
        Self {
            version: default_version(),
            models: entries.into_iter().map(|(id, entry)| (id.into(), entry)).collect(),
        }
    }

    /// Load model registry from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read model registry {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a registry document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let registry: ModelRegistry = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse model registry: {}", e)))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Every identifier must name two non-empty artifact files
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::config("model registry has no models"));
        }
        for (id, entry) in &self.models {
            if entry.model.trim().is_empty() || entry.vectorizer.trim().is_empty() {
                return Err(Error::config(format!(
                    "model '{}' must name both a model and a vectorizer artifact",
                    id
                )));
            }
        }
        Ok(())
    }

    /// Get a model configuration by name
    pub fn get_model(&self, name: &str) -> Option<&ModelEntry> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered identifiers in sorted order
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
