//! Error types shared across topiclog crates.

use std::io;

/// Result alias for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// A write to an output sink failed.
///
/// These never reach the caller of a logging method; the engine records
/// them for inspection instead.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),

    /// The record could not be encoded.
    #[error("failed to encode log record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A level name was not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected trace, debug, info, warn, error, fatal, panic or disabled)")]
pub struct ParseLevelError(pub String);
