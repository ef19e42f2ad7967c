//! Application state shared by all handlers

use crate::config::ServerConfig;
use anyhow::bail;
use fraudscan_classifiers::{ArtifactCache, FsArtifactStore, PredictionService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Prediction pipeline with its artifact cache
    pub service: PredictionService,

    /// Prometheus metrics handle for rendering, absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: PredictionService, metrics_handle: Option<PrometheusHandle>) -> Self {
        Self {
            service,
            metrics_handle,
        }
    }

    /// Wire the normalizer, artifact store and cache described by the config
    pub fn from_config(config: &ServerConfig, metrics_handle: Option<PrometheusHandle>) -> anyhow::Result<Self> {
        let registry = config.model_registry()?;
        if !registry.contains(&config.default_model) {
            bail!(
                "default model '{}' is not registered (available: {})",
                config.default_model,
                registry.model_names().join(", ")
            );
        }

        let store = FsArtifactStore::new(&config.assets_dir);
        info!(
            "Serving {} models from {}, default '{}'",
            registry.len(),
            config.assets_dir.display(),
            config.default_model
        );

        let normalizer = Arc::new(config.text_normalizer()?);
        let cache = Arc::new(ArtifactCache::new(registry, Arc::new(store)));
        let service = PredictionService::new(normalizer, cache, config.default_model.clone());

        Ok(Self::new(service, metrics_handle))
    }
}
