//! Embedding generation and vector search.
//!
//! The engine talks to both halves through traits so a different model or an
//! approximate index can be swapped in without touching retrieval logic.

pub mod embedding;
pub mod index;
pub mod types;

pub use embedding::{
    EmbeddingError, EmbeddingGenerator, FastEmbedGenerator, MOCK_MODEL_NAME,
    MockEmbeddingGenerator, create_generator, default_models_dir, parse_embedding_model,
};
pub use index::{FlatL2Index, Neighbor, VectorIndex, VectorIndexError};
pub use types::{VectorDimension, squared_l2};
