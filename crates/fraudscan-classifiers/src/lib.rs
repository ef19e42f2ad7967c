//! FraudScan Classifiers
//!
//! Everything needed to turn a job description into a fraud prediction:
//!
//! - [`normalizer`]: deterministic text cleaning (lowercase, punctuation and
//!   whitespace folding, Treebank tokenization, stop words, noun lemmas)
//! - [`artifact`]: decoding of trained vectorizers and classifiers
//! - [`store`] and [`cache`]: lazy, memoized artifact loading per model identifier
//! - [`service`]: the prediction pipeline behind the HTTP API
//!
//! Loaded artifacts are used only through the [`Transformer`] and
//! [`Classifier`] traits.

pub mod artifact;
pub mod cache;
pub mod classifier;
pub mod lemmatizer;
pub mod model_config;
pub mod models;
pub mod normalizer;
pub mod service;
pub mod stopwords;
pub mod store;
pub mod tokenizer;
pub mod vectorizer;

pub use artifact::{decode_classifier, decode_transformer, ClassifierArtifact, TransformerArtifact};
pub use cache::{ArtifactCache, LoadedModel};
pub use classifier::{Classifier, FeatureVector, Transformer};
pub use lemmatizer::Lemmatizer;
pub use model_config::{ModelEntry, ModelRegistry};
pub use models::{LogisticRegression, MultinomialNb};
pub use normalizer::TextNormalizer;
pub use service::PredictionService;
pub use stopwords::StopWords;
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use tokenizer::Tokenizer;
pub use vectorizer::{CountVectorizer, TfidfVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cache::{ArtifactCache, LoadedModel};
    pub use crate::classifier::{Classifier, FeatureVector, Transformer};
    pub use crate::model_config::ModelRegistry;
    pub use crate::normalizer::TextNormalizer;
    pub use crate::service::PredictionService;
    pub use crate::store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
}
