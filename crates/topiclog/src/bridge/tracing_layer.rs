//! Tracing subscriber integration.
//!
//! Provides a tracing `Layer` and builder that route events into an
//! engine's sinks.

use std::fmt;
use std::sync::Arc;

use topiclog_core::{Fields, Level, LogRecord, is_enabled};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::engine::Shared;

/// Map a tracing level onto the matching record level.
#[must_use]
pub fn level_from_tracing(level: &tracing::Level) -> Level {
    if *level == tracing::Level::TRACE {
        Level::Trace
    } else if *level == tracing::Level::DEBUG {
        Level::Debug
    } else if *level == tracing::Level::INFO {
        Level::Info
    } else if *level == tracing::Level::WARN {
        Level::Warn
    } else {
        Level::Error
    }
}

/// A tracing layer that writes each event as one record.
///
/// The event target becomes the topic; the enclosing span names, outermost
/// first, are joined with `::` into a `span` field.
pub struct TopicLayer {
    shared: Arc<Shared>,
}

impl TopicLayer {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }
}

impl fmt::Debug for TopicLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicLayer").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Fields,
}

impl FieldCollector {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            if self.message.is_none() {
                self.message = Some(value);
            }
        } else {
            self.fields.insert(field.name(), value);
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_value(field, topiclog_core::error_chain(value));
    }
}

impl<S> Layer<S> for TopicLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = level_from_tracing(metadata.level());
        if !is_enabled(level) {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                collector.fields.insert("span", spans.join("::"));
            }
        }

        let message = collector
            .message
            .unwrap_or_else(|| metadata.name().to_string());

        let record = LogRecord::new(level, metadata.target(), message).with_fields(collector.fields);
        self.shared.emit(&record);
    }
}

/// Builder for a tracing subscriber writing into an engine.
#[derive(Debug)]
pub struct TopicSubscriberBuilder {
    layer: TopicLayer,
    level_filter: LevelFilter,
}

impl TopicSubscriberBuilder {
    /// Create a builder around `layer`, passing every level through.
    ///
    /// The engine's own gate still applies after the filter.
    #[must_use]
    pub fn new(layer: TopicLayer) -> Self {
        Self {
            layer,
            level_filter: LevelFilter::TRACE,
        }
    }

    /// Set the subscriber-level filter.
    #[must_use]
    pub fn with_level_filter(mut self, filter: LevelFilter) -> Self {
        self.level_filter = filter;
        self
    }

    /// Build the subscriber without installing it.
    #[must_use]
    pub fn build(self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry()
            .with(self.level_filter)
            .with(self.layer)
    }

    /// Build and install as the global subscriber.
    pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
        tracing::subscriber::set_global_default(self.build())
    }
}
