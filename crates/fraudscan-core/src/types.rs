//! Request and response types for job-posting predictions

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier used when a request does not name a model
pub const DEFAULT_MODEL_LABEL: &str = "nb_bow";

/// Class code emitted by a binary classifier
pub type ClassCode = usize;

/// Class code for a legitimate posting
pub const LEGITIMATE: ClassCode = 0;

/// Class code for a fraudulent posting
pub const FRAUDULENT: ClassCode = 1;

/// Human-readable label for a class code
pub fn class_label(code: ClassCode) -> &'static str {
    if code == FRAUDULENT {
        "Fraudulent (Fake)"
    } else {
        "Non-Fraudulent (Real)"
    }
}

/// Inbound prediction request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Free text of the job posting. Absent or non-string values are treated as empty text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub job_description: Option<String>,

    /// Registry identifier of the model to use
    #[serde(default)]
    pub model_label: Option<String>,
}

impl PredictionRequest {
    /// Create a request for the default model
    pub fn new(job_description: impl Into<String>) -> Self {
        Self {
            job_description: Some(job_description.into()),
            model_label: None,
        }
    }

    /// Select a model by registry identifier
    pub fn with_model(mut self, model_label: impl Into<String>) -> Self {
        self.model_label = Some(model_label.into());
        self
    }

    /// Length of the raw description in characters
    pub fn input_len(&self) -> usize {
        self.job_description
            .as_deref()
            .map(|text| text.chars().count())
            .unwrap_or(0)
    }
}

/// Accept any JSON value, keeping only strings
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Per-class probability breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub non_fraudulent: f64,
    pub fraudulent: f64,
}

/// Outbound prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction_label: String,
    pub prediction_code: ClassCode,
    /// Probability mass the model assigned to its predicted class
    pub confidence_score: f64,
    pub probabilities: ClassProbabilities,
    pub input_text_length: usize,
    pub cleaned_text_length: usize,
    pub model_used: String,
}
