//! Configuration module for the retrieval engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `DOCSAGE_` and use double underscores
//! to separate nested levels:
//! - `DOCSAGE_CHUNKING__CHUNK_SIZE=500` sets `chunking.chunk_size`
//! - `DOCSAGE_CORPUS__PATH=./kb` sets `corpus.path`
//! - `DOCSAGE_RETRIEVAL__TOP_K=5` sets `retrieval.top_k`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use crate::documents::ChunkingConfig;
pub use crate::intent::IntentRuleConfig;

/// Directory that marks a workspace and holds `settings.toml`.
pub const CONFIG_DIR: &str = ".docsage";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "DOCSAGE_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Corpus location and file selection
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Chunk size and overlap
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding model settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Query-time settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Small-talk gate settings
    #[serde(default)]
    pub intent: IntentConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorpusConfig {
    /// Directory holding the plain-text documents
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,

    /// File extension (without the dot) that marks a corpus document
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Sort file names before processing so chunk order is reproducible
    #[serde(default = "default_true")]
    pub sort_by_name: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EmbeddingConfig {
    /// Model name, e.g. `AllMiniLML6V2` or `all-MiniLM-L6-v2`
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Where downloaded model weights are cached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Show a progress bar while the model downloads
    #[serde(default = "default_true")]
    pub show_download_progress: bool,

    /// Number of chunks sent to the model per call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RetrievalConfig {
    /// Number of chunks returned when the caller does not ask for a count
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IntentConfig {
    /// When false every query goes to the index
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Include the built-in small-talk table
    #[serde(default = "default_true")]
    pub builtin_rules: bool,

    /// Extra rules, evaluated before the built-in table
    #[serde(default)]
    pub rules: Vec<IntentRuleConfig>,
}

/// Logging configuration with per-module level overrides.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Level applied to every target without an override
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `engine = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_corpus_path() -> PathBuf {
    PathBuf::from("documents")
}
fn default_extension() -> String {
    "txt".to_string()
}
fn default_embedding_model() -> String {
    "AllMiniLML6V2".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_top_k() -> usize {
    3
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            corpus: CorpusConfig::default(),
            chunking: ChunkingConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            intent: IntentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
            extension: default_extension(),
            sort_by_name: true,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            cache_dir: None,
            show_download_progress: true,
            batch_size: default_batch_size(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            builtin_rules: true,
            rules: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf())
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nesting levels; single underscores
            // stay part of the field name.
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.docsage/settings.toml` by searching from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file under `.docsage/`
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.corpus.path, PathBuf::from("documents"));
        assert_eq!(settings.corpus.extension, "txt");
        assert_eq!(settings.chunking.chunk_size, 1000);
        assert_eq!(settings.chunking.chunk_overlap, 200);
        assert_eq!(settings.embedding.model, "AllMiniLML6V2");
        assert_eq!(settings.retrieval.top_k, 3);
        assert!(settings.intent.enabled);
        assert_eq!(settings.logging.default, "warn");
    }

    #[test]
    fn test_load_from_toml() {
        Jail::expect_with(|jail| {
            let config_path = jail.directory().join("settings.toml");
            jail.create_file(
                "settings.toml",
                r#"
version = 2

[corpus]
path = "kb"
sort_by_name = false

[chunking]
chunk_size = 400
chunk_overlap = 50

[embedding]
model = "mock"

[[intent.rules]]
name = "weekend-report"
pattern = '\bweekend report\b'
conversational = false

[logging.modules]
engine = "debug"
"#,
            )?;

            let settings = Settings::load_from(&config_path).map_err(|e| *e)?;
            assert_eq!(settings.version, 2);
            assert_eq!(settings.corpus.path, PathBuf::from("kb"));
            assert!(!settings.corpus.sort_by_name);
            assert_eq!(settings.chunking.chunk_size, 400);
            assert_eq!(settings.chunking.chunk_overlap, 50);
            assert_eq!(settings.embedding.model, "mock");
            assert_eq!(settings.intent.rules.len(), 1);
            assert!(!settings.intent.rules[0].conversational);
            assert_eq!(settings.logging.modules["engine"], "debug");
            // Untouched sections keep their defaults
            assert_eq!(settings.retrieval.top_k, 3);
            assert_eq!(settings.corpus.extension, "txt");
            Ok(())
        });
    }

    #[test]
    fn test_save_settings() {
        Jail::expect_with(|jail| {
            let config_path = jail.directory().join("nested").join("settings.toml");

            let mut settings = Settings::default();
            settings.chunking.chunk_size = 321;
            settings.retrieval.top_k = 7;

            settings.save(&config_path).map_err(|e| e.to_string())?;

            let loaded = Settings::load_from(&config_path).map_err(|e| *e)?;
            assert_eq!(loaded.chunking.chunk_size, 321);
            assert_eq!(loaded.retrieval.top_k, 7);
            Ok(())
        });
    }

    #[test]
    fn test_layered_config() {
        Jail::expect_with(|jail| {
            jail.create_dir(CONFIG_DIR)?;
            jail.create_file(
                ".docsage/settings.toml",
                r#"
[chunking]
chunk_size = 800

[retrieval]
top_k = 4
"#,
            )?;

            jail.set_env("DOCSAGE_CHUNKING__CHUNK_SIZE", "500");
            jail.set_env("DOCSAGE_CORPUS__EXTENSION", "md");

            let settings = Settings::load().map_err(|e| *e)?;

            // Environment variable should override config file
            assert_eq!(settings.chunking.chunk_size, 500);
            // Config file value should be used when no env var
            assert_eq!(settings.retrieval.top_k, 4);
            // Env var adds a value not in the file
            assert_eq!(settings.corpus.extension, "md");
            // Defaults fill the rest
            assert_eq!(settings.chunking.chunk_overlap, 200);
            Ok(())
        });
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let settings = Settings::load().map_err(|e| *e)?;
            assert_eq!(settings.chunking.chunk_size, 1000);
            assert_eq!(settings.retrieval.top_k, 3);
            Ok(())
        });
    }
}
