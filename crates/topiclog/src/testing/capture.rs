//! In-memory writers for capturing sink output in tests

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use strip_ansi_escapes::strip;

use crate::sink::lock;

/// A cloneable writer that keeps everything written to it
///
/// Each `write` call is stored as its own chunk, so tests can check that a
/// record arrived in one piece. Clones share the same buffer; hand one clone
/// to the engine and keep another for assertions.
#[derive(Clone, Default)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl CaptureWriter {
    /// Create an empty capture writer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls received
    #[must_use]
    pub fn write_count(&self) -> usize {
        lock(&self.buffer).len()
    }

    /// Each `write` call's bytes, in arrival order
    #[must_use]
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.buffer).clone()
    }

    /// Everything written, with ANSI codes preserved
    #[must_use]
    pub fn raw_output(&self) -> String {
        let bytes: Vec<u8> = lock(&self.buffer).concat();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Everything written, with ANSI codes stripped
    #[must_use]
    pub fn output_string(&self) -> String {
        let bytes: Vec<u8> = lock(&self.buffer).concat();
        String::from_utf8_lossy(&strip(bytes)).into_owned()
    }

    /// Output split into lines (ANSI codes stripped)
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.output_string().lines().map(String::from).collect()
    }

    /// Every line parsed as a JSON value
    ///
    /// # Panics
    ///
    /// Panics if a line is not valid JSON.
    #[must_use]
    pub fn json_records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|err| panic!("line is not a JSON record ({err}): {line}"))
            })
            .collect()
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.output_string()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::Regex::new(pattern) {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.lines().len();
        assert_eq!(
            actual,
            expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected,
            actual,
            self.output_string()
        );
    }

    /// Discard everything captured so far
    pub fn clear(&self) {
        lock(&self.buffer).clear();
    }
}

impl std::fmt::Debug for CaptureWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureWriter")
            .field("write_count", &self.write_count())
            .finish()
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.buffer).push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A writer whose writes always fail, counting the attempts
#[derive(Clone, Debug, Default)]
pub struct FailingWriter {
    attempts: Arc<AtomicUsize>,
}

impl FailingWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls rejected so far
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink unavailable"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let capture = CaptureWriter::new();
        let mut writer = capture.clone();
        writer.write_all(b"hello\n").unwrap();
        assert_eq!(capture.write_count(), 1);
        capture.assert_contains("HELLO");
    }

    #[test]
    fn test_output_strips_ansi() {
        let capture = CaptureWriter::new();
        capture.clone().write_all(b"\x1b[32mINF\x1b[0m ready\n").unwrap();
        assert_eq!(capture.lines(), vec!["INF ready".to_string()]);
        assert!(capture.raw_output().contains("\x1b[32m"));
    }

    #[test]
    fn test_contains_all_and_regex() {
        let capture = CaptureWriter::new();
        capture.clone().write_all(b"request took 42ms\n").unwrap();
        assert!(capture.contains_all(&["request", "42ms"]));
        assert!(capture.matches(r"took \d+ms"));
        assert!(!capture.matches(r"took [a-z]+ms"));
        capture.assert_not_contains("error");
    }

    #[test]
    fn test_clear() {
        let capture = CaptureWriter::new();
        capture.clone().write_all(b"line\n").unwrap();
        capture.clear();
        assert_eq!(capture.write_count(), 0);
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn test_failing_writer_counts_attempts() {
        let failing = FailingWriter::new();
        let mut writer = failing.clone();
        assert!(writer.write_all(b"x").is_err());
        assert!(writer.write_all(b"y").is_err());
        assert_eq!(failing.attempts(), 2);
    }
}
