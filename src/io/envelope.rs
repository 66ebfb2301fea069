//! JSON output envelope shared by every `--json` command.
//!
//! Consumers can branch on `status` and `code` without parsing `message`.

use serde::Serialize;

use super::ExitCode;

/// Schema version for this envelope format.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Operation outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Operation succeeded with results
    Success,
    /// Operation succeeded but found nothing
    NotFound,
    /// Operation failed
    Error,
}

/// Machine-readable result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Ok,
    NotFound,
    /// Query rejected before retrieval
    InvalidQuery,
    /// Query classified as small talk
    SmallTalk,
    /// Engine could not be constructed
    BuildError,
}

/// Entity type in the data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Chunk,
    DocumentSummary,
    Intent,
}

/// Response metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    /// Schema version (semver)
    pub schema_version: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,

    /// Number of items in data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    /// Query as given by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Execution time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entity_type: None,
            count: None,
            query: None,
            duration_ms: None,
        }
    }
}

/// JSON output envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: Status,

    pub code: ResultCode,

    /// Process exit code the command finishes with
    pub exit_code: u8,

    /// Human-readable message
    pub message: String,

    /// What to change before trying again
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Result payload (null on error)
    pub data: Option<T>,

    pub meta: Meta,
}

impl<T> Envelope<T> {
    /// Create a success envelope with data.
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            code: ResultCode::Ok,
            exit_code: ExitCode::Success as u8,
            message: "Operation completed successfully".to_string(),
            hint: None,
            data: Some(data),
            meta: Meta::default(),
        }
    }

    /// Create a not-found envelope that still carries (empty) data.
    pub fn not_found(code: ResultCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status: Status::NotFound,
            code,
            exit_code: ExitCode::NotFound as u8,
            message: message.into(),
            hint: None,
            data: Some(data),
            meta: Meta::default(),
        }
    }

    /// Create an error envelope.
    pub fn error(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            code,
            exit_code: ExitCode::Error as u8,
            message: message.into(),
            hint: None,
            data: None,
            meta: Meta::default(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.meta.entity_type = Some(entity_type);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.meta.count = Some(count);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.meta.query = Some(query.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.meta.duration_ms = Some(duration_ms);
        self
    }

    /// Exit code matching `exit_code`.
    pub fn exit_code(&self) -> ExitCode {
        match self.status {
            Status::Success => ExitCode::Success,
            Status::NotFound => ExitCode::NotFound,
            Status::Error => ExitCode::Error,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error>
    where
        T: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}
