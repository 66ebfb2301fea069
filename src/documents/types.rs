//! Core types for documents, chunks, and retrieval results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// A named plain-text document loaded from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, unique within a corpus.
    pub name: String,

    /// Where the document was read from.
    pub source_path: PathBuf,

    /// Full UTF-8 text.
    pub text: String,
}

impl Document {
    /// Create a document that did not come from disk.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source_path: PathBuf::from(&name),
            name,
            text: text.into(),
        }
    }

    /// Hex SHA-256 of the text.
    pub fn content_hash(&self) -> String {
        let digest = Sha256::digest(self.text.as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Position of a chunk inside its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Owning document.
    pub document_name: String,

    /// 0-based ordinal within the document, in split order.
    pub chunk_index: usize,

    /// Character offset of the first character.
    pub start_offset: usize,

    /// Character offset one past the last character.
    pub end_offset: usize,
}

/// A chunk of a document with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Where the chunk sits in its document.
    pub metadata: ChunkMetadata,

    /// The chunk text; equal to the document text between the offsets.
    pub text: String,
}

impl Chunk {
    /// Owning document name.
    pub fn document_name(&self) -> &str {
        &self.metadata.document_name
    }

    /// Get the length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One ranked hit returned by the retrieval engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    /// Source document name.
    pub document_name: String,

    /// Full chunk text.
    pub text: String,

    /// Chunk position metadata.
    pub metadata: ChunkMetadata,

    /// Squared Euclidean distance to the query (lower is closer).
    pub distance: f32,
}

impl RetrievalResult {
    /// Borrow as the `(document name, chunk text, metadata)` triple.
    pub fn as_triple(&self) -> (&str, &str, &ChunkMetadata) {
        (&self.document_name, &self.text, &self.metadata)
    }
}
