//! Retrieval engine: builds the chunk index once and answers queries.
//!
//! Construction loads the corpus, chunks every document, embeds every chunk
//! and builds a vector index. Either all of that succeeds or an error is
//! returned; there is no partially built engine. Queries never fail: small
//! talk, an empty corpus and backend errors all produce an empty result.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::Settings;
use crate::documents::{
    Chunk, ChunkingConfig, CorpusError, CorpusOptions, Document, RecursiveChunker,
    RetrievalResult, chunk_document, load_corpus,
};
use crate::intent::{Intent, IntentError, IntentFilter};
use crate::vector::{
    EmbeddingError, EmbeddingGenerator, FlatL2Index, VectorIndex, VectorIndexError,
    create_generator,
};

/// Default batch size for embedding generation.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Default number of results for `retrieve_default`.
pub const DEFAULT_TOP_K: usize = 3;

/// Errors from constructing a retrieval engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector index error: {0}")]
    Index(#[from] VectorIndexError),

    #[error("Intent filter error: {0}")]
    Intent(#[from] IntentError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Progress updates during engine construction.
#[derive(Debug, Clone, Copy)]
pub enum BuildProgress<'a> {
    /// Splitting a document into chunks
    ChunkingDocument {
        current: usize,
        total: usize,
        name: &'a str,
    },
    /// Embedding chunks; `current` counts chunks embedded so far
    EmbeddingChunks { current: usize, total: usize },
}

/// Construction parameters.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub chunking: ChunkingConfig,

    /// Chunks per embedding call.
    pub batch_size: usize,

    /// Result count used by `retrieve_default`.
    pub default_top_k: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            default_top_k: DEFAULT_TOP_K,
        }
    }
}

impl From<&Settings> for BuildOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            chunking: settings.chunking.clone(),
            batch_size: settings.embedding.batch_size,
            default_top_k: settings.retrieval.top_k,
        }
    }
}

impl BuildOptions {
    fn validate(&self) -> EngineResult<()> {
        self.chunking.validate().map_err(EngineError::InvalidConfig)?;
        if self.batch_size == 0 {
            return Err(EngineError::InvalidConfig(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Size of a built engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Documents handed to the engine, including ones that produced no chunks
    pub documents: usize,
    pub chunks: usize,
    pub dimension: usize,
    pub model: String,
}

/// Semantic retrieval over a fixed corpus.
///
/// Immutable after construction; `retrieve` only reads, so a built engine can
/// be shared behind an `Arc` and queried from several threads.
pub struct RetrievalEngine {
    embedder: Arc<dyn EmbeddingGenerator>,
    index: Box<dyn VectorIndex>,
    /// Position `i` here is vector `i` in `index`
    chunks: Vec<Chunk>,
    intent: IntentFilter,
    summary: BTreeMap<String, usize>,
    document_count: usize,
    default_top_k: usize,
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("model", &self.embedder.model_name())
            .field("documents", &self.document_count)
            .field("chunks", &self.chunks.len())
            .field("default_top_k", &self.default_top_k)
            .finish()
    }
}

impl RetrievalEngine {
    /// Build from settings: load the corpus, load the model, index everything.
    pub fn from_settings(settings: &Settings) -> EngineResult<Self> {
        Self::from_settings_with_progress(settings, |_| {})
    }

    /// Like [`from_settings`](Self::from_settings) with progress reporting.
    pub fn from_settings_with_progress<F>(settings: &Settings, on_progress: F) -> EngineResult<Self>
    where
        F: FnMut(BuildProgress<'_>),
    {
        let options = BuildOptions::from(settings);
        options.validate()?;

        // Cheap checks first so a bad rule or path fails before the model loads
        let intent = IntentFilter::from_config(&settings.intent)?;
        let documents = load_corpus(&settings.corpus.path, &CorpusOptions::from(&settings.corpus))?;
        let embedder = create_generator(&settings.embedding)?;

        Self::build_with_progress(documents, embedder, &options, intent, on_progress)
    }

    /// Build over in-memory documents with default batch size and `top_k`.
    pub fn build(
        documents: Vec<Document>,
        embedder: Arc<dyn EmbeddingGenerator>,
        chunking: &ChunkingConfig,
        intent: IntentFilter,
    ) -> EngineResult<Self> {
        let options = BuildOptions {
            chunking: chunking.clone(),
            ..BuildOptions::default()
        };
        Self::build_with_progress(documents, embedder, &options, intent, |_| {})
    }

    /// Build over in-memory documents, reporting progress.
    pub fn build_with_progress<F>(
        documents: Vec<Document>,
        embedder: Arc<dyn EmbeddingGenerator>,
        options: &BuildOptions,
        intent: IntentFilter,
        mut on_progress: F,
    ) -> EngineResult<Self>
    where
        F: FnMut(BuildProgress<'_>),
    {
        options.validate()?;

        let chunker = RecursiveChunker::new();
        let total_documents = documents.len();
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut summary: BTreeMap<String, usize> = BTreeMap::new();

        for (idx, document) in documents.iter().enumerate() {
            on_progress(BuildProgress::ChunkingDocument {
                current: idx + 1,
                total: total_documents,
                name: &document.name,
            });

            let doc_chunks = chunk_document(&chunker, document, &options.chunking);
            tracing::debug!(
                target: "engine",
                "chunked {} into {} chunks (sha256 {})",
                document.name,
                doc_chunks.len(),
                &document.content_hash()[..12]
            );

            if !doc_chunks.is_empty() {
                *summary.entry(document.name.clone()).or_default() += doc_chunks.len();
            }
            chunks.extend(doc_chunks);
        }

        let vectors = embed_chunks(embedder.as_ref(), &chunks, options.batch_size, &mut on_progress)?;
        let index = FlatL2Index::build(embedder.dimension(), &vectors)?;

        tracing::info!(
            target: "engine",
            "engine ready: {} documents, {} chunks, model {} ({} dims)",
            total_documents,
            chunks.len(),
            embedder.model_name(),
            embedder.dimension()
        );

        Ok(Self {
            embedder,
            index: Box::new(index),
            chunks,
            intent,
            summary,
            document_count: total_documents,
            default_top_k: options.default_top_k,
        })
    }

    /// Up to `top_k` chunks nearest to `query`, most similar first.
    ///
    /// Returns an empty list when the index is empty, when the query is small
    /// talk, or when embedding or search fails.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<RetrievalResult> {
        if self.index.is_empty() {
            tracing::debug!(target: "engine", "index is empty, nothing to retrieve");
            return Vec::new();
        }

        if let Intent::SmallTalk { rule } = self.intent.classify(query) {
            tracing::debug!(target: "engine", "small talk (rule {rule}), skipping retrieval");
            return Vec::new();
        }

        let embedding = match self.embedder.generate_embedding(query) {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!(target: "engine", "failed to embed query: {e}");
                return Vec::new();
            }
        };

        let neighbors = match self.index.search(&embedding, top_k) {
            Ok(neighbors) => neighbors,
            Err(e) => {
                tracing::warn!(target: "engine", "vector search failed: {e}");
                return Vec::new();
            }
        };

        let results: Vec<RetrievalResult> = neighbors
            .into_iter()
            .filter_map(|neighbor| {
                let Some(chunk) = self.chunks.get(neighbor.position) else {
                    tracing::debug!(
                        target: "engine",
                        "dropping out-of-range position {}",
                        neighbor.position
                    );
                    return None;
                };
                Some(RetrievalResult {
                    document_name: chunk.metadata.document_name.clone(),
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                    distance: neighbor.distance,
                })
            })
            .collect();

        tracing::debug!(target: "engine", "retrieved {} chunks", results.len());
        results
    }

    /// [`retrieve`](Self::retrieve) with the configured default `top_k`.
    pub fn retrieve_default(&self, query: &str) -> Vec<RetrievalResult> {
        self.retrieve(query, self.default_top_k)
    }

    /// Chunk count per document name. Documents that produced no chunks are absent.
    pub fn document_summary(&self) -> &BTreeMap<String, usize> {
        &self.summary
    }

    /// Intent decision for `query`, without touching the index.
    pub fn classify(&self, query: &str) -> Intent {
        self.intent.classify(query)
    }

    pub fn is_conversational(&self, query: &str) -> bool {
        self.intent.is_conversational(query)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            documents: self.document_count,
            chunks: self.chunks.len(),
            dimension: self.embedder.dimension().get(),
            model: self.embedder.model_name().to_string(),
        }
    }

    /// All chunks in index order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }
}

/// Embed chunk texts in batches, checking the model returns one vector per text.
fn embed_chunks<F>(
    embedder: &dyn EmbeddingGenerator,
    chunks: &[Chunk],
    batch_size: usize,
    on_progress: &mut F,
) -> EngineResult<Vec<Vec<f32>>>
where
    F: FnMut(BuildProgress<'_>),
{
    let total = chunks.len();
    let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(total);

    for batch in chunks.chunks(batch_size) {
        let texts: Vec<&str> = batch.iter().map(|chunk| chunk.text.as_str()).collect();
        let embeddings = embedder.generate_embeddings(&texts)?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Generation(format!(
                "Model returned {} embeddings for {} chunks",
                embeddings.len(),
                texts.len()
            ))
            .into());
        }

        vectors.extend(embeddings);
        on_progress(BuildProgress::EmbeddingChunks {
            current: vectors.len(),
            total,
        });
    }

    tracing::debug!(target: "embedding", "embedded {total} chunks in batches of {batch_size}");
    Ok(vectors)
}
