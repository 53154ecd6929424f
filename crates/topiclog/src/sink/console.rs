//! Human-readable console output
//!
//! Lines look like:
//!
//! ```text
//! 14:03:27 ERR [Foo] unable to create the foo error="disk full" name=alpha
//! ```

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use console::Style;
use time::macros::format_description;
use topiclog_core::{Level, LogRecord, SinkResult};

use super::{Sink, lock};
use crate::detection::ConsoleStyle;

/// Renders records as single console lines.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    style: ConsoleStyle,
    show_timestamps: bool,
}

impl ConsoleFormatter {
    #[must_use]
    pub fn new(style: ConsoleStyle) -> Self {
        Self {
            style,
            show_timestamps: true,
        }
    }

    /// Toggle the leading `HH:MM:SS` (UTC) column.
    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    #[must_use]
    pub fn style(&self) -> ConsoleStyle {
        self.style
    }

    /// Format one record, without the trailing newline.
    #[must_use]
    pub fn format_line(&self, record: &LogRecord) -> String {
        let mut parts = Vec::with_capacity(4 + record.fields().len());

        if self.show_timestamps {
            if let Ok(ts) = record
                .timestamp()
                .format(format_description!("[hour]:[minute]:[second]"))
            {
                parts.push(self.paint(&ts, Style::new().dim()));
            }
        }

        parts.push(self.paint(record.level().tag(), level_style(record.level())));

        if !record.topic().is_empty() {
            let topic = format!("[{}]", escape(record.topic()));
            parts.push(self.paint(&topic, Style::new().cyan()));
        }

        parts.push(escape(record.message()));

        if let Some(error) = record.error() {
            parts.push(format!(
                "{}={}",
                self.paint("error", Style::new().red()),
                quote(error)
            ));
        }

        for (key, value) in record.fields().sorted() {
            parts.push(format!(
                "{}={}",
                self.paint(&quote(key), Style::new().dim()),
                quote(value)
            ));
        }

        parts.join(" ")
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.style.is_colored() {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Trace => Style::new().magenta(),
        Level::Debug => Style::new().blue(),
        Level::Info => Style::new().green(),
        Level::Warn => Style::new().yellow(),
        Level::Error => Style::new().red(),
        Level::Fatal | Level::Panic => Style::new().red().bold(),
        Level::Disabled => Style::new().dim(),
    }
}

// Keys and values with spaces, quotes, `=` or control characters would be
// ambiguous unquoted.
fn quote(value: &str) -> String {
    if value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
    {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

// Keeps a message or topic on one line: control characters become escapes.
fn escape(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_string();
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Console sink writing one formatted line per record, to stderr unless
/// redirected.
pub struct ConsoleSink {
    formatter: ConsoleFormatter,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Console sink on the process's stderr.
    #[must_use]
    pub fn stderr(style: ConsoleStyle) -> Self {
        Self::from_boxed(Box::new(io::stderr()), style)
    }

    /// Console sink on a custom writer (for testing or redirection).
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(writer: W, style: ConsoleStyle) -> Self {
        Self::from_boxed(Box::new(writer), style)
    }

    #[must_use]
    pub fn from_boxed(out: Box<dyn Write + Send>, style: ConsoleStyle) -> Self {
        Self {
            formatter: ConsoleFormatter::new(style),
            out: Mutex::new(out),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: ConsoleFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn formatter(&self) -> &ConsoleFormatter {
        &self.formatter
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &LogRecord) -> SinkResult<()> {
        let mut line = self.formatter.format_line(record);
        line.push('\n');

        let mut out = lock(&self.out);
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn flush(&self) -> SinkResult<()> {
        lock(&self.out).flush()?;
        Ok(())
    }
}
