//! Topic-scoped loggers.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use topiclog_core::{Fields, Level, LogRecord, error_chain, is_enabled};

use crate::engine::Shared;

/// A logger bound to one topic
///
/// Created with [`crate::Engine::sub`]. Every enabled call writes exactly one
/// record to each of the engine's sinks. Calls below the process-wide level
/// are no-ops and never build a record.
#[derive(Clone)]
pub struct SubLogger {
    topic: Arc<str>,
    shared: Arc<Shared>,
}

impl SubLogger {
    pub(crate) fn new(topic: Arc<str>, shared: Arc<Shared>) -> Self {
        Self { topic, shared }
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Whether a call at `level` would currently write
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        is_enabled(level)
    }

    pub fn trace(&self, message: &str, fields: impl Into<Fields>) {
        self.log(Level::Trace, message, None, fields);
    }

    pub fn debug(&self, message: &str, fields: impl Into<Fields>) {
        self.log(Level::Debug, message, None, fields);
    }

    pub fn info(&self, message: &str, fields: impl Into<Fields>) {
        self.log(Level::Info, message, None, fields);
    }

    pub fn warn(&self, message: &str, fields: impl Into<Fields>) {
        self.log(Level::Warn, message, None, fields);
    }

    /// Record a failure; `err` and its sources are joined into the `error` key.
    pub fn error(&self, message: &str, err: Option<&dyn Error>, fields: impl Into<Fields>) {
        self.log(Level::Error, message, err, fields);
    }

    /// Write the record, flush every sink and exit the process with status 1
    ///
    /// The process exits even when the level gate suppresses the record.
    pub fn fatal(&self, message: &str, err: Option<&dyn Error>, fields: impl Into<Fields>) -> ! {
        self.log(Level::Fatal, message, err, fields);
        // Nothing left to report a flush failure to
        let _ = self.shared.flush();
        std::process::exit(1)
    }

    /// Write the record, flush every sink and panic with `message`
    ///
    /// The panic happens even when the level gate suppresses the record.
    pub fn panic(&self, message: &str, err: Option<&dyn Error>, fields: impl Into<Fields>) -> ! {
        self.log(Level::Panic, message, err, fields);
        let _ = self.shared.flush();
        panic!("{message}")
    }

    /// Write a record at any level
    ///
    /// `Fatal` and `Panic` are written like any other level here; only
    /// [`Self::fatal`] and [`Self::panic`] terminate.
    pub fn log(&self, level: Level, message: &str, err: Option<&dyn Error>, fields: impl Into<Fields>) {
        if !is_enabled(level) {
            return;
        }

        let mut record = LogRecord::new(level, &*self.topic, message).with_fields(fields.into());
        if let Some(err) = err {
            record = record.with_error(error_chain(err));
        }
        self.shared.emit(&record);
    }
}

impl fmt::Debug for SubLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubLogger")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}
