//! Tests against a real fastembed model.
//!
//! These download model weights on first run, so they are ignored by default.
//! Run with: `cargo test --test embedding_model_test -- --ignored`

use anyhow::Result;
use docsage::vector::{EmbeddingGenerator, FastEmbedGenerator, parse_embedding_model};
use docsage::{ChunkingConfig, Document, IntentFilter, RetrievalEngine};
use std::sync::Arc;

fn generator() -> Result<FastEmbedGenerator> {
    let (model, name) = parse_embedding_model("all-MiniLM-L6-v2")?;
    Ok(FastEmbedGenerator::with_options(
        model,
        name,
        docsage::vector::default_models_dir(),
        false,
    )?)
}

#[test]
#[ignore = "Downloads 86MB model - run with --ignored"]
fn test_embeddings_are_normalized() -> Result<()> {
    let generator = generator()?;
    let embeddings = generator.generate_embeddings(&["AI ethics covers fairness"])?;

    assert_eq!(embeddings.len(), 1);
    assert_eq!(embeddings[0].len(), 384);
    assert_eq!(generator.dimension().get(), 384);

    let magnitude: f32 = embeddings[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 0.01, "Embedding magnitude: {magnitude}");
    Ok(())
}

#[test]
#[ignore = "Downloads 86MB model - run with --ignored"]
fn test_semantic_retrieval() -> Result<()> {
    let documents = vec![
        Document::new(
            "ethics.txt",
            "AI ethics covers fairness, accountability, and transparency.",
        ),
        Document::new(
            "ml.txt",
            "Machine learning types include supervised, unsupervised, and reinforcement learning.",
        ),
        Document::new("volcano.txt", "Volcanoes erupt molten rock called lava."),
    ];
    let engine = RetrievalEngine::build(
        documents,
        Arc::new(generator()?),
        &ChunkingConfig::default(),
        IntentFilter::builtin()?,
    )?;

    // No shared keywords with the volcano document
    let results = engine.retrieve("Which mountains spew magma?", 1);
    assert_eq!(results[0].document_name, "volcano.txt");

    let results = engine.retrieve("What kinds of learning algorithms exist?", 1);
    assert_eq!(results[0].document_name, "ml.txt");
    Ok(())
}
