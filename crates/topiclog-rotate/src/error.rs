//! Error types for opening the rotating file writer

use std::io;
use std::path::PathBuf;

/// Result type for rotating writer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening the writer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The active file could not be opened for appending
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// The active file
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to create the log directory
    #[error("failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// The configured path has no file name component
    #[error("log file path {0} has no file name")]
    InvalidPath(PathBuf),
}
