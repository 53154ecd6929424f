//! The root logger.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use topiclog_core::{Level, LogRecord, SinkError, SinkResult, global_level, set_global_level};

use crate::bridge::{LogBridge, TopicLayer, TopicSubscriberBuilder};
use crate::config::{EngineConfig, WriteErrorHook};
use crate::detection::ConsoleStyle;
use crate::error::{ConfigError, Result};
use crate::sink::{ConsoleSink, MultiSink, Sink, WriterSink, lock};
use crate::sub_logger::SubLogger;

/// Root logger owning the composed sinks
///
/// Cheap to clone; clones and every [`SubLogger`] share the same sinks.
///
/// ```no_run
/// use topiclog::{Engine, EngineConfig, Level, fields};
///
/// let engine = Engine::new(EngineConfig::builder().console(true).level(Level::Info).build())?;
/// let log = engine.sub("Foo");
/// log.info("starting", fields! { "version" => "1.2" });
/// # Ok::<(), topiclog::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

/// Sinks and diagnostics shared by the engine, its sub-loggers and bridges.
pub(crate) struct Shared {
    sink: MultiSink,
    diagnostics: Diagnostics,
}

struct Diagnostics {
    last_error: Mutex<Option<String>>,
    count: AtomicU64,
    hook: Option<WriteErrorHook>,
}

impl Engine {
    /// Validate the configuration, compose the sinks and apply the level
    ///
    /// Console output comes first, then the file writer. The process-wide
    /// level gate is only changed once the configuration is known to be
    /// valid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        if config.has_no_writer() {
            return Err(ConfigError::NoWriter);
        }

        let EngineConfig {
            console,
            file_writer,
            level,
            console_style,
            console_writer,
            on_write_error,
        } = config;

        let mut sink = MultiSink::default();
        if console {
            let style = console_style.unwrap_or_else(ConsoleStyle::detect);
            let console_sink = match console_writer {
                Some(writer) => ConsoleSink::from_boxed(writer, style),
                None => ConsoleSink::stderr(style),
            };
            sink.push(Box::new(console_sink));
        }
        if let Some(writer) = file_writer {
            sink.push(Box::new(WriterSink::from_boxed(writer)));
        }

        apply_level(level);

        Ok(Self {
            shared: Arc::new(Shared {
                sink,
                diagnostics: Diagnostics {
                    last_error: Mutex::new(None),
                    count: AtomicU64::new(0),
                    hook: on_write_error,
                },
            }),
        })
    }

    /// Logger whose records carry `topic`
    #[must_use]
    pub fn sub(&self, topic: impl Into<String>) -> SubLogger {
        SubLogger::new(Arc::from(topic.into()), Arc::clone(&self.shared))
    }

    /// Logger with the empty topic
    #[must_use]
    pub fn root(&self) -> SubLogger {
        self.sub("")
    }

    /// Current process-wide minimum level
    #[must_use]
    pub fn level(&self) -> Level {
        global_level()
    }

    /// Change the process-wide minimum level
    pub fn set_level(&self, level: Level) {
        apply_level(level);
    }

    /// Flush every sink
    pub fn flush(&self) -> SinkResult<()> {
        self.shared.flush()
    }

    /// Message of the most recent sink write failure
    #[must_use]
    pub fn last_write_error(&self) -> Option<String> {
        lock(&self.shared.diagnostics.last_error).clone()
    }

    /// Number of sink write failures so far
    #[must_use]
    pub fn write_error_count(&self) -> u64 {
        self.shared.diagnostics.count.load(Ordering::Relaxed)
    }

    /// A `log::Log` implementation writing into this engine
    #[must_use]
    pub fn log_bridge(&self) -> LogBridge {
        LogBridge::new(Arc::clone(&self.shared))
    }

    /// Route the `log` facade into this engine
    ///
    /// Returns an error if a logger has already been set.
    pub fn install_log_bridge(&self) -> std::result::Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.log_bridge()))?;
        log::set_max_level(global_level().to_log_filter());
        Ok(())
    }

    /// A `tracing_subscriber` layer writing into this engine
    #[must_use]
    pub fn tracing_layer(&self) -> TopicLayer {
        TopicLayer::new(Arc::clone(&self.shared))
    }

    /// Builder for a tracing subscriber writing into this engine
    #[must_use]
    pub fn tracing_subscriber(&self) -> TopicSubscriberBuilder {
        TopicSubscriberBuilder::new(self.tracing_layer())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("sink", &self.shared.sink)
            .field("level", &global_level())
            .field("write_errors", &self.write_error_count())
            .finish()
    }
}

// The `log` facade keeps its own max level; keep it in step with the gate.
fn apply_level(level: Level) {
    set_global_level(level);
    log::set_max_level(level.to_log_filter());
}

impl Shared {
    /// Write one record; failures go to the diagnostics, never the caller.
    pub(crate) fn emit(&self, record: &LogRecord) {
        if let Err(err) = self.sink.write(record) {
            self.diagnostics.record(&err);
        }
    }

    pub(crate) fn flush(&self) -> SinkResult<()> {
        self.sink.flush()
    }
}

impl Diagnostics {
    fn record(&self, err: &SinkError) {
        self.count.fetch_add(1, Ordering::Relaxed);
        *lock(&self.last_error) = Some(err.to_string());
        if let Some(hook) = &self.hook {
            hook(err);
        }
    }
}
