//! CLI module for the retrieval engine.
//!
//! Provides command-line interface parsing and command dispatch.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands};
