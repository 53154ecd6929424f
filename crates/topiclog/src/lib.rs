//! Leveled, structured logging with topic-scoped sub-loggers.
//!
//! An [`Engine`] composes the configured sinks (a console and/or a byte
//! writer such as a [`RotatingFileWriter`]) behind a process-wide minimum
//! level, and hands out [`SubLogger`]s bound to a topic:
//!
//! ```no_run
//! use topiclog::{Engine, EngineConfig, Fields, Level, RotatingFileWriter, fields};
//!
//! let file = RotatingFileWriter::new("logs/app.log", 2, 1, true)?;
//! let engine = Engine::new(
//!     EngineConfig::builder()
//!         .console(true)
//!         .file_writer(file)
//!         .level(Level::Info)
//!         .build(),
//! )?;
//!
//! let foo = engine.sub("Foo");
//! foo.info("ready", fields! { "port" => "8080" });
//! foo.debug("suppressed at info", Fields::new());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Every enabled call produces exactly one record on every sink: a
//! human-readable line on the console and one JSON object per line on the
//! file writer. Write failures never reach the caller; see
//! [`Engine::last_write_error`].
//!
//! # Modules
//!
//! - [`config`] - [`EngineConfig`] and TOML/environment [`config::LogSettings`]
//! - [`sink`] - console, JSON writer and fan-out sinks
//! - [`bridge`] - `log` and `tracing` integration
//! - [`detection`] - console color detection
//! - [`testing`] - capture writers for tests

#![forbid(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod detection;
mod engine;
mod error;
pub mod sink;
mod sub_logger;
pub mod testing;

pub use config::{EngineConfig, EngineConfigBuilder, FileSettings, LogSettings, WriteErrorHook};
pub use detection::ConsoleStyle;
pub use engine::Engine;
pub use error::{ConfigError, Result};
pub use sub_logger::SubLogger;

pub use topiclog_core::{Fields, Level, LogRecord, ParseLevelError, SinkError, SinkResult, fields};
pub use topiclog_rotate::RotatingFileWriter;
