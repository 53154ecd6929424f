//! Output sinks.
//!
//! A [`Sink`] accepts finished records and is responsible for turning each
//! one into bytes and writing them as a single unit:
//! - [`ConsoleSink`] - human-readable lines, stderr by default
//! - [`WriterSink`] - JSON lines into any [`std::io::Write`], e.g. a
//!   [`topiclog_rotate::RotatingFileWriter`]
//! - [`MultiSink`] - fans each record out to several sinks in order

mod console;
mod multi;
mod writer;

use std::sync::{Mutex, MutexGuard, PoisonError};

use topiclog_core::{LogRecord, SinkResult};

pub use console::{ConsoleFormatter, ConsoleSink};
pub use multi::MultiSink;
pub use writer::WriterSink;

/// A destination for log records.
///
/// Implementations must write each record atomically with respect to other
/// concurrent calls on the same sink.
pub trait Sink: Send + Sync {
    /// Write one record.
    fn write(&self, record: &LogRecord) -> SinkResult<()>;

    /// Flush anything buffered.
    fn flush(&self) -> SinkResult<()>;
}

// A panic on another thread mid-write must not silence the sink for good.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
