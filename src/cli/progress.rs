//! Terminal progress for engine construction.
//!
//! One bar per build phase, drawn on stderr. Bars are hidden when disabled
//! or when stderr is not a terminal.

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::engine::BuildProgress;

const PROGRESS_TEMPLATE: &str = "{prefix:>10.cyan.bold} {bar:28.cyan/blue} {pos}/{len} {msg}";
const PROGRESS_CHARS: &str = "█▓░";

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS)
}

/// Progress bars for the chunking and embedding phases.
pub struct BuildProgressBars {
    enabled: bool,
    chunking: Option<ProgressBar>,
    embedding: Option<ProgressBar>,
}

impl BuildProgressBars {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: enabled && Term::stderr().is_term(),
            chunking: None,
            embedding: None,
        }
    }

    fn bar(&self, total: usize, prefix: &'static str) -> ProgressBar {
        let bar = ProgressBar::with_draw_target(Some(total as u64), self.draw_target());
        bar.set_style(bar_style());
        bar.set_prefix(prefix);
        bar
    }

    fn draw_target(&self) -> ProgressDrawTarget {
        if self.enabled {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        }
    }

    /// Feed one progress event.
    pub fn update(&mut self, progress: BuildProgress<'_>) {
        match progress {
            BuildProgress::ChunkingDocument {
                current,
                total,
                name,
            } => {
                let bar = match &self.chunking {
                    Some(bar) => bar.clone(),
                    None => {
                        let bar = self.bar(total, "Chunking");
                        self.chunking = Some(bar.clone());
                        bar
                    }
                };
                bar.set_position(current as u64);
                bar.set_message(name.to_string());
                if current == total {
                    bar.finish_with_message("done");
                }
            }
            BuildProgress::EmbeddingChunks { current, total } => {
                let bar = match &self.embedding {
                    Some(bar) => bar.clone(),
                    None => {
                        let bar = self.bar(total, "Embedding");
                        self.embedding = Some(bar.clone());
                        bar
                    }
                };
                bar.set_position(current as u64);
                if current == total {
                    bar.finish_with_message("done");
                }
            }
        }
    }

    /// Clear any bar left unfinished (e.g. after a failed build).
    pub fn finish(&self) {
        for bar in [&self.chunking, &self.embedding].into_iter().flatten() {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
    }
}
