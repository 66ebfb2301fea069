//! Classify command - run the small-talk filter without loading a model.

use console::style;

use super::emit_json;
use crate::config::Settings;
use crate::intent::{Intent, IntentFilter};
use crate::io::{EntityType, Envelope, ExitCode, ResultCode};

/// Run the classify command.
pub fn run(settings: &Settings, query: &str, json: bool) -> ExitCode {
    let filter = match IntentFilter::from_config(&settings.intent) {
        Ok(filter) => filter,
        Err(e) => {
            if json {
                let envelope: Envelope<()> = Envelope::error(ResultCode::BuildError, e.to_string());
                return emit_json(&envelope);
            }
            eprintln!("Error: {e}");
            return ExitCode::Error;
        }
    };

    let intent = filter.classify(query);

    if json {
        let envelope = Envelope::success(&intent)
            .with_entity_type(EntityType::Intent)
            .with_query(query);
        return emit_json(&envelope);
    }

    match &intent {
        Intent::SmallTalk { rule } => println!(
            "{} (rule: {rule}); retrieval would be skipped",
            style("small talk").yellow().bold()
        ),
        Intent::InformationSeeking { rule: Some(rule) } => println!(
            "{} (rule: {rule})",
            style("information-seeking").green().bold()
        ),
        Intent::InformationSeeking { rule: None } => {
            println!("{}", style("information-seeking").green().bold())
        }
    }

    ExitCode::Success
}
