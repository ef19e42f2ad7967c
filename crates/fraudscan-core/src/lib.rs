//! FraudScan Core
//!
//! Core types shared across FraudScan components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Prediction request and response types
//! - Class codes and their display labels

pub mod error;
pub mod types;

pub use error::{ArtifactError, Error, Result};
pub use types::{
    class_label, ClassCode, ClassProbabilities, PredictionRequest, PredictionResponse,
    DEFAULT_MODEL_LABEL, FRAUDULENT, LEGITIMATE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{ArtifactError, Error, Result};
    pub use crate::types::{ClassCode, PredictionRequest, PredictionResponse};
}
