//! Artifact stores
//!
//! A store is a read-only key-value lookup from artifact filename to bytes,
//! populated out of band by the training pipeline.

use async_trait::async_trait;
use fraudscan_core::ArtifactError;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Read-only source of serialized artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Load the raw bytes of an artifact by filename
    async fn load(&self, name: &str) -> Result<Vec<u8>, ArtifactError>;

    /// Short description used in logs
    fn describe(&self) -> String;
}

/// Artifacts stored as files under a single directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a filename under the root, refusing names that escape it
    fn resolve(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !plain {
            return Err(ArtifactError::NotFound(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn load(&self, name: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.resolve(name)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArtifactError::NotFound(name.to_string()))
            }
            Err(source) => Err(ArtifactError::Read {
                name: name.to_string(),
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Artifacts held in memory, for tests and embedded deployments
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    artifacts: HashMap<String, Vec<u8>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact
    pub fn with_artifact(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.artifacts.insert(name.into(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn load(&self, name: &str) -> Result<Vec<u8>, ArtifactError> {
        self.artifacts
            .get(name)
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        format!("memory ({} artifacts)", self.artifacts.len())
    }
}
