//! Configuration errors.
//!
//! Sink write failures are deliberately absent here: they never reach the
//! caller of a logging method. See [`crate::Engine::last_write_error`].

use topiclog_core::ParseLevelError;

/// Result alias for engine construction and settings loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The engine could not be built from the given configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Neither console nor file output was enabled.
    #[error("at least one writer (console or file) must be configured")]
    NoWriter,

    /// A level name did not parse.
    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),

    /// A setting had a value of the wrong shape.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Setting or environment variable name
        key: String,
        /// The rejected value
        value: String,
    },

    /// The TOML document did not match the settings schema.
    #[error("invalid logging configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The rotating log file could not be opened.
    #[error("failed to open log file: {0}")]
    FileWriter(#[from] topiclog_rotate::Error),
}
