//! Test fixtures and a counting artifact store
//!
//! The fixture models are tiny but behave like the trained ones: the
//! bag-of-words models flag the sample scam posting as fraudulent and fall
//! back to the legitimate prior on empty text.

#![allow(dead_code)]

use async_trait::async_trait;
use fraudscan_classifiers::{
    ArtifactCache, ArtifactStore, Lemmatizer, ModelRegistry, PredictionService, TextNormalizer,
};
use fraudscan_core::ArtifactError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

pub const SCAM_POSTING: &str = "Earn $5000/week working from home, no experience needed!!!";
pub const REAL_POSTING: &str = "Our engineering team is hiring an office engineer. Competitive salary.";

pub const VOCABULARY: [&str; 10] = [
    "earn", "5000week", "working", "home", "experience", "needed", "team", "salary", "office", "engineer",
];

const LEGIT_TERM_PROBS: [f64; 10] = [0.02, 0.01, 0.1, 0.05, 0.15, 0.07, 0.2, 0.15, 0.15, 0.1];
const FRAUD_TERM_PROBS: [f64; 10] = [0.25, 0.2, 0.1, 0.2, 0.05, 0.1, 0.03, 0.03, 0.02, 0.02];
const LR_COEF: [f64; 10] = [2.0, 2.5, 0.0, 1.5, -0.5, 0.3, -1.5, -1.0, -1.0, -1.2];

fn vocabulary() -> Value {
    let map: serde_json::Map<String, Value> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), json!(i)))
        .collect();
    Value::Object(map)
}

pub fn bow_vectorizer() -> Value {
    json!({ "kind": "count_vectorizer", "vocabulary": vocabulary() })
}

pub fn tfidf_vectorizer() -> Value {
    json!({
        "kind": "tfidf_vectorizer",
        "vocabulary": vocabulary(),
        "idf": [2.1, 3.4, 1.3, 1.6, 1.2, 1.5, 1.4, 1.8, 1.7, 2.2],
        "sublinear_tf": false
    })
}

pub fn naive_bayes(fraud_prior: f64) -> Value {
    let ln = |probs: &[f64]| probs.iter().map(|p| p.ln()).collect::<Vec<_>>();
    json!({
        "kind": "multinomial_nb",
        "classes": [0, 1],
        "class_log_prior": [(1.0 - fraud_prior).ln(), fraud_prior.ln()],
        "feature_log_prob": [ln(&LEGIT_TERM_PROBS), ln(&FRAUD_TERM_PROBS)]
    })
}

pub fn logistic_regression(intercept: f64) -> Value {
    json!({
        "kind": "logistic_regression",
        "classes": [0, 1],
        "coef": [LR_COEF],
        "intercept": [intercept]
    })
}

/// Every artifact the built-in registry refers to
pub fn builtin_artifacts() -> HashMap<String, Vec<u8>> {
    let artifacts = [
        ("bow_vectorizer.json", bow_vectorizer()),
        ("tfidf_vectorizer.json", tfidf_vectorizer()),
        ("nb_model_bow.json", naive_bayes(0.05)),
        ("nb_model_bow_res.json", naive_bayes(0.5)),
        ("nb_model_tfidf.json", naive_bayes(0.05)),
        ("nb_model_tfidf_res.json", naive_bayes(0.5)),
        ("lr_model_bow.json", logistic_regression(-2.0)),
        ("lr_model_bow_res.json", logistic_regression(-0.5)),
        ("lr_model_tfidf.json", logistic_regression(-2.0)),
        ("lr_model_tfidf_res.json", logistic_regression(-0.5)),
    ];

    artifacts
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string().into_bytes()))
        .collect()
}

/// In-memory store that records every load
pub struct CountingStore {
    artifacts: RwLock<HashMap<String, Vec<u8>>>,
    loads: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
    latency: Option<Duration>,
}

impl CountingStore {
    pub fn new(artifacts: HashMap<String, Vec<u8>>) -> Self {
        Self {
            artifacts: RwLock::new(artifacts),
            loads: Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
            latency: None,
        }
    }

    /// Store holding every built-in artifact
    pub fn builtin() -> Self {
        Self::new(builtin_artifacts())
    }

    /// Simulate slow storage
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&self, name: &str, bytes: Vec<u8>) {
        self.artifacts.write().unwrap().insert(name.to_string(), bytes);
    }

    pub fn remove(&self, name: &str) {
        self.artifacts.write().unwrap().remove(name);
    }

    /// Total number of load calls
    pub fn total_loads(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Number of load calls for one artifact
    pub fn loads_of(&self, name: &str) -> usize {
        self.loads.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ArtifactStore for CountingStore {
    async fn load(&self, name: &str) -> Result<Vec<u8>, ArtifactError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.loads.lock().unwrap().entry(name.to_string()).or_insert(0) += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.artifacts
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        "counting test store".to_string()
    }
}

/// Noun lemmatizer over the bundled dictionary fixture
pub fn wordnet() -> Lemmatizer {
    Lemmatizer::from_wordnet_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/wordnet")).unwrap()
}

/// A service over the built-in registry and the given store
pub fn service_with(store: Arc<CountingStore>) -> PredictionService {
    let cache = Arc::new(ArtifactCache::new(ModelRegistry::builtin(), store));
    let normalizer = Arc::new(TextNormalizer::english(wordnet()).unwrap());
    PredictionService::new(normalizer, cache, "nb_bow")
}
