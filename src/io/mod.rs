//! Output handling for the CLI.
//!
//! Commands print human-readable text by default and a JSON envelope when
//! `--json` is passed.

pub mod envelope;

pub use envelope::{EntityType, Envelope, ResultCode, SCHEMA_VERSION, Status};

/// Process exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command succeeded and produced results
    Success = 0,
    /// Command succeeded but nothing matched
    NotFound = 1,
    /// Configuration, corpus or model failure
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
