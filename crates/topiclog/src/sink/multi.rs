//! Fan-out over several sinks.

use topiclog_core::{LogRecord, SinkResult};

use super::Sink;

/// Writes each record to every member sink, in order.
///
/// The first failure stops the fan-out and is returned; sinks earlier in
/// the list keep what they already wrote.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn Sink>>,
}

impl MultiSink {
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl std::fmt::Debug for MultiSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSink").field("sinks", &self.sinks.len()).finish()
    }
}

impl Sink for MultiSink {
    fn write(&self, record: &LogRecord) -> SinkResult<()> {
        for sink in &self.sinks {
            sink.write(record)?;
        }
        Ok(())
    }

    /// Flushes every member, returning the first error after trying all.
    fn flush(&self) -> SinkResult<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(err) = sink.flush() {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
