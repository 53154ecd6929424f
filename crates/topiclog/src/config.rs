//! Engine configuration.
//!
//! [`EngineConfig`] is what [`crate::Engine::new`] consumes. It can be
//! written as a struct literal, assembled with [`EngineConfig::builder`], or
//! produced from [`LogSettings`], which loads from TOML and environment
//! variables and opens the rotating file writer itself.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use topiclog_core::{Level, SinkError};
use topiclog_rotate::{DEFAULT_MAX_SIZE_MB, RotatingFileWriter};

use crate::detection::{ConsoleStyle, is_plain_requested};
use crate::error::{ConfigError, Result};

/// Called with every sink write failure.
pub type WriteErrorHook = Arc<dyn Fn(&SinkError) + Send + Sync>;

/// Everything needed to build an [`crate::Engine`]
///
/// At least one of `console` / `file_writer` must be set.
#[derive(Default)]
pub struct EngineConfig {
    /// Write human-readable lines to the console (stderr unless redirected)
    pub console: bool,
    /// Byte writer receiving JSON lines, usually a [`RotatingFileWriter`]
    pub file_writer: Option<Box<dyn Write + Send>>,
    /// Minimum level; applied process-wide
    pub level: Level,
    /// Console rendering (None = auto-detect)
    pub console_style: Option<ConsoleStyle>,
    /// Redirect console output away from stderr (only used when `console`)
    pub console_writer: Option<Box<dyn Write + Send>>,
    /// Observer for sink write failures
    pub on_write_error: Option<WriteErrorHook>,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// True when neither output is configured.
    #[must_use]
    pub fn has_no_writer(&self) -> bool {
        !self.console && self.file_writer.is_none()
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("console", &self.console)
            .field("file_writer", &self.file_writer.is_some())
            .field("level", &self.level)
            .field("console_style", &self.console_style)
            .field("console_writer", &self.console_writer.is_some())
            .field("on_write_error", &self.on_write_error.is_some())
            .finish()
    }
}

/// Builder for [`EngineConfig`]
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Enable or disable console output
    #[must_use]
    pub fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Send console lines to `writer` instead of stderr. Enables the console.
    #[must_use]
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.config.console = true;
        self.config.console_writer = Some(Box::new(writer));
        self
    }

    /// Set the console style instead of detecting it
    #[must_use]
    pub fn console_style(mut self, style: ConsoleStyle) -> Self {
        self.config.console_style = Some(style);
        self
    }

    /// Add the JSON-lines file output
    #[must_use]
    pub fn file_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.config.file_writer = Some(Box::new(writer));
        self
    }

    /// Set the minimum level
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    /// Observe write failures
    #[must_use]
    pub fn on_write_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SinkError) + Send + Sync + 'static,
    {
        self.config.on_write_error = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Rotating file output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    /// Active log file; backups are written beside it
    pub path: PathBuf,
    /// Size in megabytes before rotating (0 = 100)
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
    /// Rotated files to keep (0 = all)
    #[serde(default)]
    pub max_backups: usize,
    /// Gzip rotated files
    #[serde(default)]
    pub compress: bool,
}

fn default_max_size_mb() -> u64 {
    DEFAULT_MAX_SIZE_MB
}

impl FileSettings {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_backups: 0,
            compress: false,
        }
    }

    #[must_use]
    pub fn max_size_mb(mut self, mb: u64) -> Self {
        self.max_size_mb = mb;
        self
    }

    #[must_use]
    pub fn max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Open the rotating writer these settings describe
    pub fn open(&self) -> Result<RotatingFileWriter> {
        Ok(RotatingFileWriter::new(
            self.path.clone(),
            self.max_size_mb,
            self.max_backups,
            self.compress,
        )?)
    }
}

/// Declarative logging settings
///
/// ```toml
/// level = "debug"
/// console = true
/// console_style = "plain"
///
/// [file]
/// path = "logs/app.log"
/// max_size_mb = 2
/// max_backups = 1
/// compress = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    pub level: Level,
    pub console: bool,
    /// None = auto-detect
    pub console_style: Option<ConsoleStyle>,
    pub file: Option<FileSettings>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Level::Info,
            console: true,
            console_style: None,
            file: None,
        }
    }
}

impl LogSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Defaults overlaid with the process environment
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `TOPICLOG_LEVEL` | trace/debug/info/warn/error/fatal/panic/disabled | Minimum level |
    /// | `TOPICLOG_CONSOLE` | 0/1, true/false | Console output |
    /// | `TOPICLOG_FILE` | path | Enable rotating file output |
    /// | `TOPICLOG_FILE_MAX_SIZE_MB` | integer | Rotation size |
    /// | `TOPICLOG_FILE_MAX_BACKUPS` | integer | Backups kept (0 = all) |
    /// | `TOPICLOG_FILE_COMPRESS` | 0/1, true/false | Gzip backups |
    /// | `TOPICLOG_FORCE_COLOR` | (set) | Colored console |
    /// | `TOPICLOG_PLAIN` / `NO_COLOR` | (set) | Plain console |
    pub fn from_env() -> Result<Self> {
        Self::default().apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay variables from `lookup` onto these settings
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(level) = lookup("TOPICLOG_LEVEL") {
            self.level = level.trim().parse()?;
        }
        if let Some(value) = lookup("TOPICLOG_CONSOLE") {
            self.console = parse_bool("TOPICLOG_CONSOLE", &value)?;
        }

        if lookup("TOPICLOG_FORCE_COLOR").is_some() {
            self.console_style = Some(ConsoleStyle::Colored);
        } else if is_plain_requested(&lookup) {
            self.console_style = Some(ConsoleStyle::Plain);
        }

        if let Some(path) = lookup("TOPICLOG_FILE") {
            let file = self.file.take().unwrap_or_else(|| FileSettings::new(""));
            self.file = Some(FileSettings {
                path: PathBuf::from(path),
                ..file
            });
        }
        // Size/backup/compress overrides only mean something with a file
        if let Some(file) = self.file.as_mut() {
            if let Some(value) = lookup("TOPICLOG_FILE_MAX_SIZE_MB") {
                file.max_size_mb = parse_number("TOPICLOG_FILE_MAX_SIZE_MB", &value)?;
            }
            if let Some(value) = lookup("TOPICLOG_FILE_MAX_BACKUPS") {
                file.max_backups = parse_number("TOPICLOG_FILE_MAX_BACKUPS", &value)?;
            }
            if let Some(value) = lookup("TOPICLOG_FILE_COMPRESS") {
                file.compress = parse_bool("TOPICLOG_FILE_COMPRESS", &value)?;
            }
        }

        Ok(self)
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    #[must_use]
    pub fn with_console_style(mut self, style: ConsoleStyle) -> Self {
        self.console_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: FileSettings) -> Self {
        self.file = Some(file);
        self
    }

    #[must_use]
    pub fn without_file(mut self) -> Self {
        self.file = None;
        self
    }

    /// Open the file writer (if any) and produce an [`EngineConfig`]
    pub fn into_engine_config(self) -> Result<EngineConfig> {
        let file_writer = match &self.file {
            Some(file) => Some(Box::new(file.open()?) as Box<dyn Write + Send>),
            None => None,
        };

        Ok(EngineConfig {
            console: self.console,
            file_writer,
            level: self.level,
            console_style: self.console_style,
            console_writer: None,
            on_write_error: None,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
