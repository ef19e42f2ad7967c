//! Server configuration

use anyhow::Context;
use clap::Args;
use fraudscan_classifiers::{Lemmatizer, ModelRegistry, TextNormalizer};
use fraudscan_core::DEFAULT_MODEL_LABEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Server configuration, read from YAML and overridden from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding model and vectorizer artifacts
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Optional YAML model registry; the built-in table is used otherwise
    #[serde(default)]
    pub registry_path: Option<PathBuf>,

    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Comma-separated list of allowed CORS origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    /// Models loaded at startup instead of on first request
    #[serde(default)]
    pub preload: Vec<String>,

    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

/// Text normalizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// WordNet dictionary directory (with `index.noun` and `noun.exc`)
    #[serde(default = "default_wordnet_dir")]
    pub wordnet_dir: PathBuf,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            wordnet_dir: default_wordnet_dir(),
        }
    }
}

/// Command-line overrides shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Listen address
    #[arg(short = 'l', long, global = true)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, global = true)]
    pub port: Option<u16>,

    /// Model artifact directory
    #[arg(short, long, global = true)]
    pub assets: Option<PathBuf>,

    /// Model registry file
    #[arg(short, long, global = true)]
    pub registry: Option<PathBuf>,

    /// Default model identifier
    #[arg(short = 'm', long, global = true)]
    pub default_model: Option<String>,

    /// Allowed CORS origins, comma separated
    #[arg(long, env = "CORS_ORIGINS", global = true)]
    pub cors_origins: Option<String>,

    /// Models to load at startup, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub preload: Vec<String>,

    /// WordNet dictionary directory for lemmatization
    #[arg(long, global = true)]
    pub wordnet_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: impl AsRef<Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();

        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_yaml_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        config.apply(overrides);
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply CLI overrides
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(listen) = &overrides.listen {
            self.listen = listen.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(assets) = &overrides.assets {
            self.assets_dir = assets.clone();
        }
        if let Some(registry) = &overrides.registry {
            self.registry_path = Some(registry.clone());
        }
        if let Some(model) = &overrides.default_model {
            self.default_model = model.clone();
        }
        if let Some(origins) = &overrides.cors_origins {
            self.cors_origins = origins.clone();
        }
        if !overrides.preload.is_empty() {
            self.preload = overrides.preload.clone();
        }
        if let Some(dir) = &overrides.wordnet_dir {
            self.normalizer.wordnet_dir = dir.clone();
        }
    }

    /// Allowed origins with blanks removed
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }

    /// The configured registry file, or the built-in table
    pub fn model_registry(&self) -> anyhow::Result<ModelRegistry> {
        match &self.registry_path {
            Some(path) => {
                let registry = ModelRegistry::from_file(path)?;
                info!("Loaded {} models from {}", registry.len(), path.display());
                Ok(registry)
            }
            None => Ok(ModelRegistry::builtin()),
        }
    }

    /// Build the text normalizer from the configured WordNet dictionary
    pub fn text_normalizer(&self) -> anyhow::Result<TextNormalizer> {
        let dir = &self.normalizer.wordnet_dir;
        let lemmatizer = Lemmatizer::from_wordnet_dir(dir)
            .with_context(|| format!("WordNet noun dictionary required in {}", dir.display()))?;
        Ok(TextNormalizer::english(lemmatizer)?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            assets_dir: default_assets_dir(),
            registry_path: None,
            default_model: default_model(),
            cors_origins: default_cors_origins(),
            preload: Vec::new(),
            normalizer: NormalizerConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("model_assets")
}

fn default_model() -> String {
    DEFAULT_MODEL_LABEL.to_string()
}

fn default_wordnet_dir() -> PathBuf {
    PathBuf::from("wordnet")
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDNET_FIXTURE: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/../fraudscan-classifiers/tests/fixtures/wordnet");

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.default_model, "nb_bow");
        assert_eq!(config.assets_dir, PathBuf::from("model_assets"));
        assert_eq!(
            config.cors_origin_list(),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ServerConfig::from_yaml_str(
            r#"
port: 9100
preload: [nb_bow, lr_tfidf]
normalizer:
  wordnet_dir: /usr/share/wordnet/dict
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.preload, vec!["nb_bow", "lr_tfidf"]);
        assert_eq!(config.normalizer.wordnet_dir, PathBuf::from("/usr/share/wordnet/dict"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraudscan.yaml");
        std::fs::write(&path, "port: 9100\ndefault_model: lr_bow\n").unwrap();

        let overrides = ConfigOverrides {
            port: Some(9200),
            cors_origins: Some(" https://jobs.example.com , ,http://localhost:5173".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::load(&path, &overrides).unwrap();

        assert_eq!(config.port, 9200);
        assert_eq!(config.default_model, "lr_bow");
        assert_eq!(
            config.cors_origin_list(),
            vec!["https://jobs.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("does-not-exist.yaml", &ConfigOverrides::default()).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert!(config.model_registry().unwrap().contains("nb_tfidf_res"));
        assert_eq!(config.normalizer.wordnet_dir, PathBuf::from("wordnet"));
    }

    #[test]
    fn test_text_normalizer_requires_wordnet() {
        let mut config = ServerConfig::default();
        config.normalizer.wordnet_dir = "/nonexistent/wordnet".into();
        let err = config.text_normalizer().unwrap_err();
        assert!(format!("{err:#}").contains("index.noun"));

        config.normalizer.wordnet_dir = PathBuf::from(WORDNET_FIXTURE);
        let normalizer = config.text_normalizer().unwrap();
        assert_eq!(normalizer.normalize(Some("Data-Entry Clerks")), "dataentry clerk");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraudscan.yaml");
        std::fs::write(&path, "port: [not, a, port]\n").unwrap();
        assert!(ServerConfig::load(&path, &ConfigOverrides::default()).is_err());
    }
}
