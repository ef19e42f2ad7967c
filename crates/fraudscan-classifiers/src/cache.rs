//! Lazily loaded, memoized model artifacts
//!
//! Each registry identifier owns a `OnceCell`. The map lock is only held long
//! enough to find or insert the cell, so concurrent requests for one
//! identifier share a single load while other identifiers load independently.
//! A failed load leaves its cell empty and the next request retries.

use crate::artifact::{decode_classifier, decode_transformer};
use crate::classifier::{Classifier, Transformer};
use crate::model_config::{ModelEntry, ModelRegistry};
use crate::store::ArtifactStore;
use fraudscan_core::{ArtifactError, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

/// A classifier and the transformer that feeds it
#[derive(Clone)]
pub struct LoadedModel {
    pub identifier: String,
    pub classifier: Arc<dyn Classifier>,
    pub transformer: Arc<dyn Transformer>,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("identifier", &self.identifier)
            .field("classifier", &self.classifier.kind())
            .field("transformer", &self.transformer.kind())
            .finish()
    }
}

type Slot<T> = Arc<OnceCell<T>>;

/// Process-wide cache of loaded models keyed by registry identifier
pub struct ArtifactCache {
    registry: ModelRegistry,
    store: Arc<dyn ArtifactStore>,
    models: RwLock<HashMap<String, Slot<LoadedModel>>>,
    // keyed by vectorizer filename, shared across identifiers
    transformers: RwLock<HashMap<String, Slot<Arc<dyn Transformer>>>>,
}

impl ArtifactCache {
    pub fn new(registry: ModelRegistry, store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            registry,
            store,
            models: RwLock::new(HashMap::new()),
            transformers: RwLock::new(HashMap::new()),
        }
    }

    /// Get the model for an identifier (loads on first access)
    pub async fn resolve(&self, identifier: &str) -> Result<LoadedModel> {
        let entry = self
            .registry
            .get_model(identifier)
            .ok_or_else(|| Error::unknown_model(identifier, self.registry.model_names()))?;

        let slot = slot_for(&self.models, identifier).await;
        if let Some(loaded) = slot.get() {
            return Ok(loaded.clone());
        }

        match slot.get_or_try_init(|| self.load(identifier, entry)).await {
            Ok(loaded) => Ok(loaded.clone()),
            Err(e) => {
                warn!(model = identifier, error = %e, "Failed to load model");
                Err(e)
            }
        }
    }

    /// Load the given identifiers, stopping at the first failure
    pub async fn preload(&self, identifiers: &[String]) -> Result<()> {
        for identifier in identifiers {
            self.resolve(identifier).await?;
        }
        Ok(())
    }

    /// Identifiers whose artifacts are currently loaded, sorted
    pub async fn loaded_models(&self) -> Vec<String> {
        let models = self.models.read().await;
        let mut loaded: Vec<String> = models
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(identifier, _)| identifier.clone())
            .collect();
        loaded.sort();
        loaded
    }

    /// All registered identifiers, sorted
    pub fn available_models(&self) -> Vec<String> {
        self.registry.model_names()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    async fn load(&self, identifier: &str, entry: &ModelEntry) -> Result<LoadedModel> {
        let started = Instant::now();
        info!(
            model = identifier,
            classifier = %entry.model,
            vectorizer = %entry.vectorizer,
            "Loading model from {}",
            self.store.describe()
        );

        let transformer = self
            .transformer(&entry.vectorizer)
            .await
            .map_err(|e| Error::artifact_missing(identifier, e))?;

        let bytes = self
            .store
            .load(&entry.model)
            .await
            .map_err(|e| Error::artifact_missing(identifier, e))?;
        let classifier =
            decode_classifier(&entry.model, &bytes).map_err(|e| Error::artifact_missing(identifier, e))?;

        if classifier.n_features() != transformer.dimension() {
            let reason = format!(
                "classifier expects {} features but vectorizer '{}' produces {}",
                classifier.n_features(),
                entry.vectorizer,
                transformer.dimension()
            );
            return Err(Error::artifact_missing(
                identifier,
                ArtifactError::invalid(&entry.model, reason),
            ));
        }

        metrics::counter!("fraudscan_model_loads_total").increment(1);
        info!(
            model = identifier,
            classifier_kind = classifier.kind(),
            transformer_kind = transformer.kind(),
            features = transformer.dimension(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model loaded"
        );

        Ok(LoadedModel {
            identifier: identifier.to_string(),
            classifier,
            transformer,
        })
    }

    async fn transformer(&self, name: &str) -> std::result::Result<Arc<dyn Transformer>, ArtifactError> {
        let slot = slot_for(&self.transformers, name).await;
        let transformer = slot
            .get_or_try_init(|| async {
                debug!(vectorizer = name, "Loading vectorizer");
                let bytes = self.store.load(name).await?;
                decode_transformer(name, &bytes)
            })
            .await?;
        Ok(Arc::clone(transformer))
    }
}

/// Find the cell for a key, inserting an empty one on first sight
async fn slot_for<T>(map: &RwLock<HashMap<String, Slot<T>>>, key: &str) -> Slot<T> {
    {
        let slots = map.read().await;
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
    }

    let mut slots = map.write().await;
    Arc::clone(
        slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new())),
    )
}
