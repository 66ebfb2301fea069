//! Configuration types for document chunking.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by adjacent chunks of the same document.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Separators tried in priority order. An empty string splits between characters.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", ""]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            separators: default_separators(),
        }
    }
}

impl ChunkingConfig {
    /// Create a config with the default separator priority.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: default_separators(),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }

        if self.separators.is_empty() {
            return Err("separators must contain at least one entry".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.separators, vec!["\n\n", "\n", " ", ""]);
    }

    #[test]
    fn test_chunking_config_validation() {
        let mut config = ChunkingConfig::default();

        // Valid config
        assert!(config.validate().is_ok());

        // Invalid: overlap >= size
        config.chunk_overlap = 1000;
        assert!(config.validate().is_err());

        // Invalid: zero size
        config.chunk_size = 0;
        config.chunk_overlap = 0;
        assert!(config.validate().is_err());

        // Invalid: nothing to split on
        let config = ChunkingConfig {
            separators: Vec::new(),
            ..ChunkingConfig::new(100, 10)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_default_separators() {
        let config: ChunkingConfig = toml::from_str("chunk_size = 300").unwrap();
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.separators.len(), 4);
    }
}
