use anyhow::Context;
use clap::Parser;

use docsage::Settings;
use docsage::cli::commands::{self, retrieve::RetrieveArgs};
use docsage::cli::{Cli, Commands};
use docsage::io::ExitCode;

fn main() -> std::process::ExitCode {
    match run() {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::Error.into()
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Init only writes defaults; it must work even when the current file is broken
    if let Commands::Init { force } = cli.command {
        return Ok(commands::init::run_init(force));
    }

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Settings::load().context("Failed to load configuration")?,
    };

    if let Some(corpus) = cli.corpus {
        settings.corpus.path = corpus;
    }

    docsage::logging::init_with_config(&settings.logging);
    tracing::debug!(target: "cli", "settings loaded: corpus {}", settings.corpus.path.display());

    let show_progress = !cli.no_progress;
    let code = match cli.command {
        Commands::Init { force } => commands::init::run_init(force),
        Commands::Config => commands::init::run_config(&settings),
        Commands::Summary { json } => commands::summary::run(&settings, json, show_progress),
        Commands::Retrieve {
            query,
            top_k,
            json,
            full,
        } => commands::retrieve::run(
            &settings,
            RetrieveArgs {
                query: &query,
                top_k,
                json,
                full,
                show_progress,
            },
        ),
        Commands::Classify { query, json } => commands::classify::run(&settings, &query, json),
    };

    Ok(code)
}
