//! Console color detection
//!
//! Decides whether the console sink should emit ANSI styling.

use serde::{Deserialize, Serialize};

/// How console lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStyle {
    /// Plain text, no escape codes
    Plain,
    /// ANSI-colored level tags, dimmed keys and timestamps
    #[default]
    Colored,
}

impl ConsoleStyle {
    /// Create a plain style
    #[must_use]
    pub fn new_plain() -> Self {
        Self::Plain
    }

    /// Create a colored style
    #[must_use]
    pub fn new_colored() -> Self {
        Self::Colored
    }

    /// Auto-detect from the process environment and stderr
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var(key).ok(), console::colors_enabled_stderr())
    }

    /// Detect using a custom variable lookup and terminal capability
    #[must_use]
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>, stderr_supports_color: bool) -> Self {
        if should_colorize(lookup, stderr_supports_color) {
            Self::Colored
        } else {
            Self::Plain
        }
    }

    /// Check if this style emits ANSI codes
    #[must_use]
    pub fn is_colored(&self) -> bool {
        matches!(self, Self::Colored)
    }

    /// Check if this style is plain text
    #[must_use]
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain)
    }
}

/// Determine if plain output was explicitly requested
#[must_use]
pub fn is_plain_requested(lookup: impl Fn(&str) -> Option<String>) -> bool {
    lookup("NO_COLOR").is_some()
        || lookup("TOPICLOG_PLAIN").is_some()
        // Log collectors in CI rarely render escapes
        || lookup("CI").is_some()
}

/// Determine if console output should be colored
#[must_use]
pub fn should_colorize(lookup: impl Fn(&str) -> Option<String>, stderr_supports_color: bool) -> bool {
    // Explicit enable always wins
    if lookup("TOPICLOG_FORCE_COLOR").is_some() {
        return true;
    }

    if is_plain_requested(&lookup) {
        return false;
    }

    stderr_supports_color
}
