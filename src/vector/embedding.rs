//! Text embedding generation.
//!
//! `FastEmbedGenerator` wraps a pretrained sentence-embedding model loaded
//! once at construction. `MockEmbeddingGenerator` is a deterministic
//! feature-hashing embedder for tests and offline runs.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::VectorDimension;
use crate::config::EmbeddingConfig;

/// Model name that selects [`MockEmbeddingGenerator`].
pub const MOCK_MODEL_NAME: &str = "mock";

/// Errors from embedding generation.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error(
        "Unknown embedding model '{0}'. Supported: AllMiniLML6V2, AllMiniLML12V2, BGESmallENV15, BGEBaseENV15, NomicEmbedTextV15, ParaphraseMLMiniLML12V2, mock"
    )]
    UnknownModel(String),

    #[error("Failed to initialize embedding model: {0}")]
    ModelInit(String),

    #[error("Failed to generate embeddings: {0}")]
    Generation(String),

    #[error("Embedding has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding model lock poisoned")]
    LockPoisoned,
}

/// Maps text to fixed-dimension vectors.
///
/// Implementations must be deterministic for a given model and input.
pub trait EmbeddingGenerator: Send + Sync {
    /// One vector per input text, in input order.
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimension of every produced vector.
    fn dimension(&self) -> VectorDimension;

    /// Canonical model name, for diagnostics.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    fn generate_embedding(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.generate_embeddings(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Generation("No embedding generated".to_string()))
    }
}

/// Resolve a model name to the fastembed model and its canonical name.
///
/// Accepts enum-style names (`AllMiniLML6V2`), hub names
/// (`all-MiniLM-L6-v2`) and hub names with an organisation prefix
/// (`sentence-transformers/all-MiniLM-L6-v2`).
pub fn parse_embedding_model(name: &str) -> Result<(EmbeddingModel, &'static str), EmbeddingError> {
    let base = name.rsplit('/').next().unwrap_or(name);
    let key: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let resolved = match key.as_str() {
        "allminilml6v2" => (EmbeddingModel::AllMiniLML6V2, "AllMiniLML6V2"),
        "allminilml12v2" => (EmbeddingModel::AllMiniLML12V2, "AllMiniLML12V2"),
        "bgesmallenv15" => (EmbeddingModel::BGESmallENV15, "BGESmallENV15"),
        "bgebaseenv15" => (EmbeddingModel::BGEBaseENV15, "BGEBaseENV15"),
        "nomicembedtextv15" => (EmbeddingModel::NomicEmbedTextV15, "NomicEmbedTextV15"),
        "paraphrasemlminilml12v2" | "paraphrasemultilingualminilml12v2" => (
            EmbeddingModel::ParaphraseMLMiniLML12V2,
            "ParaphraseMLMiniLML12V2",
        ),
        _ => return Err(EmbeddingError::UnknownModel(name.to_string())),
    };

    Ok(resolved)
}

/// Default location for downloaded model weights.
pub fn default_models_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("docsage").join("models"))
        .unwrap_or_else(|| PathBuf::from(".docsage").join("models"))
}

/// Create the generator named in `config.model`.
///
/// The model is loaded here, once; the returned handle is shared by every
/// caller that embeds text.
pub fn create_generator(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingGenerator>, EmbeddingError> {
    if config.model.eq_ignore_ascii_case(MOCK_MODEL_NAME) {
        return Ok(Arc::new(MockEmbeddingGenerator::new()));
    }

    let (model, name) = parse_embedding_model(&config.model)?;
    let cache_dir = config.cache_dir.clone().unwrap_or_else(default_models_dir);
    let generator =
        FastEmbedGenerator::with_options(model, name, cache_dir, config.show_download_progress)?;
    Ok(Arc::new(generator))
}

/// Embedding generator backed by a fastembed model.
pub struct FastEmbedGenerator {
    /// The embedding model (wrapped in Mutex for interior mutability)
    model: Mutex<TextEmbedding>,

    /// Model dimensions for validation
    dimension: VectorDimension,

    model_name: &'static str,
}

impl FastEmbedGenerator {
    /// Create with the default model (AllMiniLML6V2).
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::from_settings("AllMiniLML6V2", false)
    }

    /// Create from a model name using the default cache directory.
    pub fn from_settings(model: &str, show_progress: bool) -> Result<Self, EmbeddingError> {
        let (model, name) = parse_embedding_model(model)?;
        Self::with_options(model, name, default_models_dir(), show_progress)
    }

    /// Load `model`, caching weights under `cache_dir`.
    pub fn with_options(
        model: EmbeddingModel,
        model_name: &'static str,
        cache_dir: PathBuf,
        show_progress: bool,
    ) -> Result<Self, EmbeddingError> {
        tracing::info!(
            target: "embedding",
            "loading embedding model {model_name} (cache: {})",
            cache_dir.display()
        );

        let mut text_model = TextEmbedding::try_new(
            InitOptions::new(model)
                .with_cache_dir(cache_dir)
                .with_show_download_progress(show_progress),
        )
        .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;

        // Get dimensions by generating a test embedding
        let test_embedding = text_model
            .embed(vec!["test"], None)
            .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;
        let dimension = test_embedding
            .first()
            .and_then(|v| VectorDimension::new(v.len()))
            .ok_or_else(|| EmbeddingError::ModelInit("Model produced an empty embedding".to_string()))?;

        tracing::info!(target: "embedding", "model {model_name} ready: {dimension} dimensions");

        Ok(Self {
            model: Mutex::new(text_model),
            dimension,
            model_name,
        })
    }
}

impl EmbeddingGenerator for FastEmbedGenerator {
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .model
            .lock()
            .map_err(|_| EmbeddingError::LockPoisoned)?
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Generation(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Generation(format!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }
        if let Some(bad) = embeddings.iter().find(|e| !self.dimension.matches(e)) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension.get(),
                actual: bad.len(),
            });
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        self.model_name
    }
}

/// Deterministic bag-of-words embedder.
///
/// Each lowercase alphanumeric token is hashed into a signed bucket and the
/// result is normalized to unit length, so texts sharing words land close
/// together. No model download is needed.
#[derive(Debug, Clone)]
pub struct MockEmbeddingGenerator {
    dimension: VectorDimension,
}

impl Default for MockEmbeddingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingGenerator {
    const DEFAULT_DIMENSION: usize = 64;

    pub fn new() -> Self {
        Self::with_dimension(Self::DEFAULT_DIMENSION)
    }

    /// Zero is bumped to one.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: VectorDimension::new(dimension).unwrap_or(VectorDimension::MIN),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let dim = self.dimension.get();
        let mut vector = vec![0.0f32; dim];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let digest = Sha256::digest(token.to_lowercase().as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            let slot = (u64::from_le_bytes(bucket) % dim as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl EmbeddingGenerator for MockEmbeddingGenerator {
    fn generate_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::types::squared_l2;

    #[test]
    fn test_parse_model_aliases() {
        for name in [
            "AllMiniLML6V2",
            "all-MiniLM-L6-v2",
            "sentence-transformers/all-MiniLM-L6-v2",
        ] {
            let (_, canonical) = parse_embedding_model(name).unwrap();
            assert_eq!(canonical, "AllMiniLML6V2");
        }

        let (_, canonical) = parse_embedding_model("BAAI/bge-small-en-v1.5").unwrap();
        assert_eq!(canonical, "BGESmallENV15");
    }

    #[test]
    fn test_parse_unknown_model() {
        let err = parse_embedding_model("word2vec").unwrap_err();
        assert!(matches!(err, EmbeddingError::UnknownModel(ref name) if name == "word2vec"));
    }

    #[test]
    fn test_create_mock_generator_without_download() {
        let config = EmbeddingConfig {
            model: "mock".to_string(),
            ..EmbeddingConfig::default()
        };
        let generator = create_generator(&config).unwrap();
        assert_eq!(generator.model_name(), "mock");
        assert_eq!(generator.dimension().get(), 64);
    }

    #[test]
    fn test_create_generator_rejects_unknown_model() {
        let config = EmbeddingConfig {
            model: "not-a-model".to_string(),
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            create_generator(&config),
            Err(EmbeddingError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_mock_is_deterministic_and_normalized() {
        let generator = MockEmbeddingGenerator::new();
        let a = generator.generate_embedding("AI ethics and fairness").unwrap();
        let b = generator.generate_embedding("AI ethics and fairness").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_mock_is_case_insensitive() {
        let generator = MockEmbeddingGenerator::new();
        assert_eq!(
            generator.generate_embedding("Machine Learning").unwrap(),
            generator.generate_embedding("machine learning").unwrap()
        );
    }

    #[test]
    fn test_mock_similar_texts_are_closer() {
        let generator = MockEmbeddingGenerator::with_dimension(256);
        let vectors = generator
            .generate_embeddings(&[
                "what is ai ethics",
                "ai ethics covers fairness",
                "volcanoes erupt molten rock",
            ])
            .unwrap();

        let related = squared_l2(&vectors[0], &vectors[1]);
        let unrelated = squared_l2(&vectors[0], &vectors[2]);
        assert!(related < unrelated);
    }

    #[test]
    fn test_mock_empty_text_is_zero_vector() {
        let generator = MockEmbeddingGenerator::with_dimension(8);
        let v = generator.generate_embedding("   ").unwrap();
        assert_eq!(v, vec![0.0; 8]);
    }

    #[test]
    #[ignore = "Downloads 86MB model - run with --ignored"]
    fn test_fastembed_generator_dimension() {
        let generator = FastEmbedGenerator::new().unwrap();
        assert_eq!(generator.dimension().get(), 384);

        let vectors = generator
            .generate_embeddings(&["hello world", "vector search"])
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.len() == 384));
    }
}
