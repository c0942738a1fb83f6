use engine::{EngineError, FilterError};
use thiserror::Error;

/// Per-file failures. Each one is reported once and produces no output for
/// that file.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Cannot parse file '{name}': unsupported file type (expected one of {allowed})")]
    UnsupportedType { name: String, allowed: String },

    #[error("Cannot parse file '{name}': {size} bytes exceeds the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("Cannot parse file '{name}': not UTF-8 text (invalid byte at offset {offset})")]
    NotText { name: String, offset: usize },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid entry query: {0}")]
    Query(#[from] FilterError),

    #[error("Analysis failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Analysis worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type IntakeResult<T> = Result<T, IntakeError>;
