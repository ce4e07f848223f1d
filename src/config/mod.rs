//! Configuration management for repofusion
//!
//! Handles loading, validation and environment overrides for the search
//! engine and its external collaborators.

use crate::error::{RepoFusionError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub lexical: LexicalConfig,
}

/// Retrieval and fusion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result count when the caller passes 0.
    pub default_limit: usize,
    /// The vector channel fetches `limit * vector_multiplier` candidates.
    pub vector_multiplier: usize,
    /// The lexical channel fetches `limit * lexical_multiplier` candidates.
    pub lexical_multiplier: usize,
    /// Weight on normalized vector-channel scores.
    pub semantic_weight: f64,
    /// Weight on normalized lexical-channel scores.
    pub lexical_weight: f64,
    /// Weight on fused relevance in the final blend.
    pub relevance_weight: f64,
    /// Weight on the trend adjustment in the final blend.
    pub trend_weight: f64,
    /// Timeout applied independently to every external call.
    pub timeout_secs: u64,
}

/// LLM collaborator for query understanding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key_env: String,
}

/// Embedding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub dimension: usize,
}

/// Vector index (Qdrant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    pub url: String,
    pub api_key_env: String,
    pub collection: String,
}

/// Lexical index (Elasticsearch)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalConfig {
    pub url: String,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RepoFusionError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| RepoFusionError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RepoFusionError::Io {
                source: e,
                context: format!("Failed to create config directory: {:?}", parent),
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| RepoFusionError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: REPOFUSION_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("REPOFUSION_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "LLM__MODEL" => {
                self.llm.model = value.to_string();
            }
            "EMBEDDING__ENDPOINT" => {
                self.embedding.endpoint = value.to_string();
            }
            "VECTOR__URL" => {
                self.vector.url = value.to_string();
            }
            "VECTOR__COLLECTION" => {
                self.vector.collection = value.to_string();
            }
            "LEXICAL__URL" => {
                self.lexical.url = value.to_string();
            }
            "SEARCH__DEFAULT_LIMIT" => {
                self.search.default_limit =
                    value
                        .parse()
                        .map_err(|_| RepoFusionError::InvalidConfigValue {
                            path: path.to_string(),
                            message: format!("Cannot parse '{}' as integer", value),
                        })?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            RepoFusionError::Config("Cannot determine config directory".to_string())
        })?;

        Ok(config_dir.join("repofusion").join("config.toml"))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            vector_multiplier: 10,
            lexical_multiplier: 2,
            semantic_weight: 0.7,
            lexical_weight: 0.3,
            relevance_weight: 0.7,
            trend_weight: 0.3,
            timeout_secs: 10,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000".to_string(),
            dimension: 384,
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key_env: "QDRANT_API_KEY".to_string(),
            collection: "repositories".to_string(),
        }
    }
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            vector: VectorConfig::default(),
            lexical: LexicalConfig::default(),
        }
    }
}
