//! Document loading and chunking.
//!
//! This module provides:
//! - Corpus loading from a directory of plain-text files
//! - Recursive separator-priority chunking with overlap
//! - Chunk and retrieval result types with positional metadata

pub mod chunker;
pub mod config;
pub mod loader;
pub mod types;

pub use chunker::{Chunker, RawChunk, RecursiveChunker};
pub use config::ChunkingConfig;
pub use loader::{CorpusError, CorpusOptions, load_corpus};
pub use types::{Chunk, ChunkMetadata, Document, RetrievalResult};

use crate::config::CorpusConfig;

impl From<&CorpusConfig> for CorpusOptions {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            sort_by_name: config.sort_by_name,
        }
    }
}

/// Split one document into chunks with positional metadata.
///
/// Chunk indices are 0-based in split order; offsets are character offsets
/// into `document.text`.
pub fn chunk_document(
    chunker: &dyn Chunker,
    document: &Document,
    config: &ChunkingConfig,
) -> Vec<Chunk> {
    chunker
        .chunk(&document.text, config)
        .into_iter()
        .enumerate()
        .map(|(chunk_index, raw)| Chunk {
            metadata: ChunkMetadata {
                document_name: document.name.clone(),
                chunk_index,
                start_offset: raw.char_range.0,
                end_offset: raw.char_range.1,
            },
            text: raw.content,
        })
        .collect()
}
