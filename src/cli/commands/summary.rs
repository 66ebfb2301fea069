//! Summary command - build the engine and report chunk counts.

use std::collections::BTreeMap;
use std::time::Instant;

use console::style;
use serde::Serialize;

use super::{build_engine, emit_json, report_build_error};
use crate::config::Settings;
use crate::engine::EngineStats;
use crate::io::{EntityType, Envelope, ExitCode};

#[derive(Serialize)]
struct SummaryData<'a> {
    stats: EngineStats,
    documents: &'a BTreeMap<String, usize>,
}

/// Run the summary command.
pub fn run(settings: &Settings, json: bool, show_progress: bool) -> ExitCode {
    let start = Instant::now();
    let engine = match build_engine(settings, show_progress && !json) {
        Ok(engine) => engine,
        Err(e) => return report_build_error(&e, settings, json),
    };

    let stats = engine.stats();
    let summary = engine.document_summary();

    if json {
        let count = summary.len();
        let envelope = Envelope::success(SummaryData {
            stats,
            documents: summary,
        })
        .with_entity_type(EntityType::DocumentSummary)
        .with_count(count)
        .with_duration_ms(start.elapsed().as_millis() as u64)
        .with_message(format!("Indexed {count} documents"));
        return emit_json(&envelope);
    }

    println!(
        "{} {} ({} documents, {} chunks)",
        style("Corpus:").cyan().bold(),
        settings.corpus.path.display(),
        stats.documents,
        stats.chunks
    );
    println!(
        "{} {} ({} dimensions)",
        style("Model:").cyan().bold(),
        stats.model,
        stats.dimension
    );

    if summary.is_empty() {
        println!();
        println!("No chunks indexed. Add .{} files to the corpus directory.", settings.corpus.extension);
        return ExitCode::Success;
    }

    let width = summary.keys().map(|name| name.chars().count()).max().unwrap_or(0);
    println!();
    for (name, count) in summary {
        println!("  {name:<width$}  {}", style(format!("{count} chunks")).dim());
    }

    ExitCode::Success
}
