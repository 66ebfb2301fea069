pub mod cli;
pub mod config;
pub mod documents;
pub mod engine;
pub mod intent;
pub mod io;
pub mod logging;
pub mod query;
pub mod vector;

pub use config::Settings;
pub use documents::{Chunk, ChunkMetadata, ChunkingConfig, Document, RetrievalResult};
pub use engine::{BuildOptions, BuildProgress, EngineError, EngineStats, RetrievalEngine};
pub use intent::{Intent, IntentFilter, IntentRule};
pub use vector::{
    EmbeddingGenerator, FastEmbedGenerator, FlatL2Index, MockEmbeddingGenerator, VectorIndex,
};
