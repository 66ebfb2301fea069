//! Retrieve command - answer a question with the nearest chunks.

use std::time::Instant;

use console::style;

use super::{build_engine, emit_json, report_build_error};
use crate::config::Settings;
use crate::documents::RetrievalResult;
use crate::intent::{Intent, IntentFilter};
use crate::io::{EntityType, Envelope, ExitCode, ResultCode};
use crate::query::{DEFAULT_PREVIEW_CHARS, truncate_text, validate_question};

/// Arguments for the retrieve command.
#[derive(Debug, Clone)]
pub struct RetrieveArgs<'a> {
    pub query: &'a str,
    pub top_k: Option<usize>,
    pub json: bool,
    pub full: bool,
    pub show_progress: bool,
}

/// Run the retrieve command.
pub fn run(settings: &Settings, args: RetrieveArgs<'_>) -> ExitCode {
    let start = Instant::now();
    let query = args.query;
    let top_k = args.top_k.unwrap_or(settings.retrieval.top_k);

    if !validate_question(query) {
        return report_empty(
            args.json,
            query,
            ResultCode::InvalidQuery,
            "Please ask a question of at least two words",
        );
    }

    // Small talk never needs the model, so answer it before building
    match IntentFilter::from_config(&settings.intent).map(|f| f.classify(query)) {
        Ok(Intent::SmallTalk { rule }) => {
            return report_empty(
                args.json,
                query,
                ResultCode::SmallTalk,
                &format!("Small talk (rule: {rule}); no documents retrieved"),
            );
        }
        Ok(Intent::InformationSeeking { .. }) => {}
        Err(e) => return report_build_error(&e.into(), settings, args.json),
    }

    let engine = match build_engine(settings, args.show_progress && !args.json) {
        Ok(engine) => engine,
        Err(e) => return report_build_error(&e, settings, args.json),
    };

    let results = engine.retrieve(query, top_k);
    if results.is_empty() {
        return report_empty(args.json, query, ResultCode::NotFound, "No relevant chunks found");
    }

    if args.json {
        let count = results.len();
        let envelope = Envelope::success(results)
            .with_entity_type(EntityType::Chunk)
            .with_count(count)
            .with_query(query)
            .with_duration_ms(start.elapsed().as_millis() as u64)
            .with_message(format!("Found {count} chunks"));
        return emit_json(&envelope);
    }

    for (rank, result) in results.iter().enumerate() {
        print_result(rank + 1, result, args.full);
    }

    ExitCode::Success
}

fn print_result(rank: usize, result: &RetrievalResult, full: bool) {
    let meta = &result.metadata;
    println!(
        "{} {} {}",
        style(format!("{rank}.")).cyan().bold(),
        style(&result.document_name).bold(),
        style(format!(
            "[chunk {}, chars {}..{}, distance {:.4}]",
            meta.chunk_index, meta.start_offset, meta.end_offset, result.distance
        ))
        .dim()
    );

    let text = if full {
        result.text.clone()
    } else {
        truncate_text(&result.text, DEFAULT_PREVIEW_CHARS)
    };
    for line in text.lines() {
        println!("   {line}");
    }
    println!();
}

fn report_empty(json: bool, query: &str, code: ResultCode, message: &str) -> ExitCode {
    if json {
        let envelope = Envelope::not_found(code, message, Vec::<RetrievalResult>::new())
            .with_entity_type(EntityType::Chunk)
            .with_count(0)
            .with_query(query);
        return emit_json(&envelope);
    }

    eprintln!("{message}");
    ExitCode::NotFound
}
