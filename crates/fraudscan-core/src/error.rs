//! Error types for FraudScan

/// Result type alias using FraudScan's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for FraudScan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested model label is not in the registry
    #[error("Unknown model label: {}. Available models: {}", .label, .available.join(", "))]
    UnknownModel {
        label: String,
        available: Vec<String>,
    },

    /// A registered model's artifacts could not be loaded
    #[error("Model assets not found for '{model}': {source}")]
    ArtifactMissing {
        model: String,
        #[source]
        source: ArtifactError,
    },

    /// A loaded artifact produced output that violates its contract
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors outside artifact loading
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new unknown-model error
    pub fn unknown_model(label: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownModel {
            label: label.into(),
            available,
        }
    }

    /// Create a new artifact-missing error
    pub fn artifact_missing(model: impl Into<String>, source: ArtifactError) -> Self {
        Self::ArtifactMissing {
            model: model.into(),
            source,
        }
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new filesystem error for a path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller caused this error and can fix it by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownModel { .. })
    }

    /// Short stable name used for metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownModel { .. } => "unknown_model",
            Self::ArtifactMissing { .. } => "artifact_missing",
            Self::Inference(_) => "inference",
            Self::Config(_) => "config",
            Self::Io { .. } => "io",
            Self::Internal(_) => "internal",
        }
    }
}

/// Failure to fetch or decode a single artifact file
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// No artifact with this name exists in the store
    #[error("artifact '{0}' not found")]
    NotFound(String),

    /// The artifact exists but could not be read
    #[error("failed to read artifact '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The artifact bytes are not a valid artifact document
    #[error("failed to decode artifact '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact decoded but its parameters are inconsistent
    #[error("invalid artifact '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

impl ArtifactError {
    /// Create a new invalid-artifact error
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Name of the artifact this error refers to
    pub fn artifact(&self) -> &str {
        match self {
            Self::NotFound(name) => name,
            Self::Read { name, .. } | Self::Decode { name, .. } | Self::Invalid { name, .. } => {
                name
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_model_lists_registry() {
        let err = Error::unknown_model("made_up_model", vec!["lr_bow".into(), "nb_bow".into()]);
        let msg = err.to_string();
        assert!(msg.contains("made_up_model"));
        assert!(msg.contains("lr_bow, nb_bow"));
        assert!(err.is_client_error());
        assert_eq!(err.kind(), "unknown_model");
    }

    #[test]
    fn test_artifact_missing_carries_cause() {
        let err = Error::artifact_missing("nb_bow", ArtifactError::NotFound("nb_model_bow.json".into()));
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("nb_model_bow.json"));

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("artifact 'nb_model_bow.json' not found"));
    }
}
