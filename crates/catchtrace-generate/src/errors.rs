use thiserror::Error;

use catchtrace_core::{ConfigError, EventKind};

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(
        "batch kind mismatch at position {position}, sub-batch {index}: \
         expected {expected:?}, got {got:?}"
    )]
    BatchMismatch {
        position: usize,
        index: usize,
        expected: EventKind,
        got: EventKind,
    },
    #[error("missing upstream link at position {position}: {detail}")]
    MissingLink { position: usize, detail: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
