//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Semantic retrieval over a folder of text documents
#[derive(Parser, Debug)]
#[command(
    name = "docsage",
    version = env!("CARGO_PKG_VERSION"),
    about = "Semantic retrieval over a folder of text documents",
    long_about = "Chunk, embed and search a directory of .txt files. Small talk is detected and answered with no context.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Examples:\n  docsage init\n  docsage summary\n  docsage retrieve \"What is AI ethics?\" -k 5\n  docsage classify \"how are you\"\n  docsage --corpus ./kb retrieve \"types of machine learning\" --json"
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Corpus directory (overrides corpus.path)
    #[arg(long, global = true, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .docsage directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Build the index and list chunk counts per document
    #[command(about = "Show how the corpus was chunked")]
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Retrieve the chunks most relevant to a question
    #[command(
        about = "Search the corpus for a question",
        after_help = "Small talk (greetings, thanks, farewells) always returns no chunks."
    )]
    Retrieve {
        /// Natural-language question
        query: String,

        /// Number of chunks to return (defaults to retrieval.top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Print whole chunks instead of previews
        #[arg(long)]
        full: bool,
    },

    /// Run the small-talk filter only
    #[command(about = "Show whether a query counts as small talk")]
    Classify {
        /// Query to classify
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
