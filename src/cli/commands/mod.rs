//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module and returns the process
//! exit code.

pub mod classify;
pub mod init;
pub mod retrieve;
pub mod summary;

use serde::Serialize;

use crate::cli::progress::BuildProgressBars;
use crate::config::Settings;
use crate::engine::{EngineError, RetrievalEngine};
use crate::io::{Envelope, ExitCode, ResultCode};

/// Build the engine from settings, drawing progress bars if enabled.
pub(crate) fn build_engine(
    settings: &Settings,
    show_progress: bool,
) -> Result<RetrievalEngine, EngineError> {
    let mut bars = BuildProgressBars::new(show_progress);
    let result = RetrievalEngine::from_settings_with_progress(settings, |p| bars.update(p));
    bars.finish();
    result
}

/// Report a construction failure in the requested format.
pub(crate) fn report_build_error(err: &EngineError, settings: &Settings, json: bool) -> ExitCode {
    let hint = match err {
        EngineError::Corpus(_) => Some(format!(
            "Corpus directory is {}. Set corpus.path in settings.toml or pass --corpus DIR",
            settings.corpus.path.display()
        )),
        EngineError::Embedding(_) => Some(
            "Set embedding.model to a supported model, or \"mock\" to work offline".to_string(),
        ),
        _ => None,
    };

    if json {
        let mut envelope: Envelope<()> = Envelope::error(ResultCode::BuildError, err.to_string());
        if let Some(hint) = hint {
            envelope = envelope.with_hint(hint);
        }
        return emit_json(&envelope);
    }

    eprintln!("Error: {err}");
    if let Some(hint) = hint {
        eprintln!("{hint}");
    }
    ExitCode::Error
}

/// Print an envelope as JSON and return its exit code.
pub(crate) fn emit_json<T: Serialize>(envelope: &Envelope<T>) -> ExitCode {
    match envelope.to_json() {
        Ok(json) => {
            println!("{json}");
            envelope.exit_code()
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::Error
        }
    }
}
