//! The log record and its JSON line encoding.

use std::error::Error as StdError;
use std::fmt::Write as _;

use serde::ser::{Serialize, SerializeMap, Serializer};
use time::OffsetDateTime;

use crate::{Fields, Level};

/// Keys written by every record; user fields with these names are prefixed.
pub const RESERVED_KEYS: [&str; 5] = ["timestamp", "level", "topic", "message", "error"];

/// One log entry, built per call and immediately written.
///
/// There are no mutators once the builder chain finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    timestamp: OffsetDateTime,
    level: Level,
    topic: String,
    message: String,
    error: Option<String>,
    fields: Fields,
}

impl LogRecord {
    /// Creates a record stamped with the current UTC time.
    #[must_use]
    pub fn new(level: Level, topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: OffsetDateTime::now_utc(),
            level,
            topic: topic.into(),
            message: message.into(),
            error: None,
            fields: Fields::new(),
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Overrides the timestamp (mainly for deterministic rendering).
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Encodes the record as one JSON object followed by a newline.
    pub fn to_json_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(self)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let reserved = 4 + usize::from(self.error.is_some());
        let mut map = serializer.serialize_map(Some(reserved + self.fields.len()))?;
        map.serialize_entry("timestamp", &self.timestamp.unix_timestamp())?;
        map.serialize_entry("level", self.level.as_str())?;
        map.serialize_entry("topic", &self.topic)?;
        map.serialize_entry("message", &self.message)?;
        if let Some(error) = &self.error {
            map.serialize_entry("error", error)?;
        }
        for (key, value) in self.fields.sorted() {
            if RESERVED_KEYS.contains(&key) {
                map.serialize_entry(&self.relocated_key(key), value)?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl LogRecord {
    // Prefixed until it names no user field, so every key is written once.
    fn relocated_key(&self, key: &str) -> String {
        let mut relocated = format!("fields.{key}");
        while self.fields.get(&relocated).is_some() {
            relocated.insert_str(0, "fields.");
        }
        relocated
    }
}

/// Renders an error and its `source()` chain as `outer: inner: root`.
#[must_use]
pub fn error_chain(err: &dyn StdError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(rendered, ": {cause}");
        source = cause.source();
    }
    rendered
}
