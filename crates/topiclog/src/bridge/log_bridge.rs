//! `log` facade backend.
//!
//! ```ignore
//! let engine = Engine::new(config)?;
//! engine.install_log_bridge()?;
//!
//! log::info!(target: "Foo", user = "alice"; "logged in");
//! ```

use std::fmt;
use std::sync::Arc;

use log::kv::{self, VisitSource};
use log::{Log, Metadata, Record};
use topiclog_core::{Fields, Level, LogRecord, is_enabled};

use crate::engine::Shared;

/// Routes `log` records into an engine
///
/// Target becomes the topic, the formatted arguments the message and
/// key-value pairs the fields. Filtering uses the engine's level gate.
pub struct LogBridge {
    shared: Arc<Shared>,
}

impl LogBridge {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    fn to_record(record: &Record<'_>) -> LogRecord {
        let mut collector = KeyValueCollector::default();
        // A failing source only loses the remaining pairs
        let _ = record.key_values().visit(&mut collector);

        LogRecord::new(
            Level::from(record.level()),
            record.target(),
            record.args().to_string(),
        )
        .with_fields(collector.fields)
    }
}

#[derive(Default)]
struct KeyValueCollector {
    fields: Fields,
}

impl<'kvs> VisitSource<'kvs> for KeyValueCollector {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.fields.insert(key.as_str(), value.to_string());
        Ok(())
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        is_enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.shared.emit(&Self::to_record(record));
    }

    fn flush(&self) {
        let _ = self.shared.flush();
    }
}

impl fmt::Debug for LogBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBridge").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CaptureWriter, gate_lock};
    use crate::{Engine, EngineConfig};

    fn bridge(level: Level) -> (LogBridge, CaptureWriter) {
        let capture = CaptureWriter::new();
        let engine = Engine::new(
            EngineConfig::builder()
                .file_writer(capture.clone())
                .level(level)
                .build(),
        )
        .unwrap();
        (engine.log_bridge(), capture)
    }

    #[test]
    fn test_bridge_enabled_follows_gate() {
        let _gate = gate_lock();
        let (bridge, _capture) = bridge(Level::Info);

        assert!(bridge.enabled(&Metadata::builder().level(log::Level::Error).target("t").build()));
        assert!(bridge.enabled(&Metadata::builder().level(log::Level::Info).target("t").build()));
        assert!(!bridge.enabled(&Metadata::builder().level(log::Level::Debug).target("t").build()));
    }

    #[test]
    fn test_bridge_maps_target_message_and_pairs() {
        let _gate = gate_lock();
        let (bridge, capture) = bridge(Level::Trace);

        let pairs = [("user", "alice"), ("attempt", "2")];
        bridge.log(
            &Record::builder()
                .level(log::Level::Warn)
                .target("auth")
                .args(format_args!("login slow: {}ms", 1200))
                .key_values(&pairs)
                .build(),
        );

        let records = capture.json_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "warn");
        assert_eq!(records[0]["topic"], "auth");
        assert_eq!(records[0]["message"], "login slow: 1200ms");
        assert_eq!(records[0]["user"], "alice");
        assert_eq!(records[0]["attempt"], "2");
    }

    #[test]
    fn test_bridge_drops_records_below_gate() {
        let _gate = gate_lock();
        let (bridge, capture) = bridge(Level::Error);

        bridge.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("auth")
                .args(format_args!("quiet"))
                .build(),
        );
        assert_eq!(capture.write_count(), 0);
    }
}
