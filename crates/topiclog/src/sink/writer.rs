//! JSON-lines sink over an arbitrary writer.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

use topiclog_core::{LogRecord, SinkResult};

use super::{Sink, lock};

/// Serializes each record as one JSON object per line.
///
/// The record is encoded before the lock is taken and written with a
/// single `write_all`, so concurrent records never interleave.
pub struct WriterSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl WriterSink {
    #[must_use]
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::from_boxed(Box::new(writer))
    }

    #[must_use]
    pub fn from_boxed(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl fmt::Debug for WriterSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").finish_non_exhaustive()
    }
}

impl Sink for WriterSink {
    fn write(&self, record: &LogRecord) -> SinkResult<()> {
        let line = record.to_json_line()?;
        let mut writer = lock(&self.writer);
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> SinkResult<()> {
        lock(&self.writer).flush()?;
        Ok(())
    }
}
