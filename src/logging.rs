//! Tracing setup for the binary and for ad-hoc debugging of the library.
//!
//! Output is a single compact line per event on stderr, timestamped to the
//! millisecond. Levels come from `[logging]` in `settings.toml`; `RUST_LOG`
//! replaces them entirely when set.
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! engine = "debug"  # build timings, query decisions
//! intent = "trace"  # every rule evaluation
//! ```
//!
//! ```bash
//! RUST_LOG=engine=debug,embedding=info docsage retrieve "what is AI ethics?"
//! ```
//!
//! Targets emitted by the library: `corpus`, `chunker`, `embedding`, `index`,
//! `intent`, `engine`. The binary adds `cli`.

use std::sync::Once;

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// `HH:MM:SS.mmm` in local time.
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Directive string such as `warn,engine=debug`.
fn filter_directives(config: &LoggingConfig) -> String {
    std::iter::once(config.default.clone())
        .chain(
            config
                .modules
                .iter()
                .map(|(target, level)| format!("{target}={level}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter for `config`, or `RUST_LOG` when that is set.
///
/// A directive string that does not parse falls back to `warn` with a note
/// on stderr; a typo in settings should not abort a query.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return EnvFilter::from_default_env();
    }

    let directives = filter_directives(config);
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid [logging] levels '{directives}': {e}");
        EnvFilter::new("warn")
    })
}

/// Install the global subscriber. Only the first call in a process has effect.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(ClockTime)
            .with_target(true)
            .with_level(true)
            .with_filter(build_filter(config));

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::registry().with(layer).try_init();
    });
}

/// Install the subscriber with `LoggingConfig::default()`.
pub fn init() {
    init_with_config(&LoggingConfig::default());
}
