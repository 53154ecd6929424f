//! The process-wide level gate.
//!
//! Every logger in the process compares against the same value, so changing
//! it affects all of them at once. Set it once during startup, before
//! threads begin logging.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::Level;

static GATE: AtomicU8 = AtomicU8::new(Level::Trace as u8);

/// Sets the minimum level for the whole process.
pub fn set_global_level(level: Level) {
    GATE.store(level as u8, Ordering::Relaxed);
}

/// Returns the current process-wide minimum level.
#[inline]
#[must_use]
pub fn global_level() -> Level {
    Level::from_u8(GATE.load(Ordering::Relaxed))
}

/// Returns whether a call at `level` passes the gate.
///
/// `Disabled` is never enabled as a call level.
#[inline]
#[must_use]
pub fn is_enabled(level: Level) -> bool {
    level != Level::Disabled && level >= global_level()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate touching the gate, so no serialization needed.
    #[test]
    fn gate_filters_below_minimum() {
        set_global_level(Level::Warn);
        assert_eq!(global_level(), Level::Warn);
        assert!(!is_enabled(Level::Info));
        assert!(is_enabled(Level::Warn));
        assert!(is_enabled(Level::Panic));
        assert!(!is_enabled(Level::Disabled));

        set_global_level(Level::Disabled);
        assert!(!is_enabled(Level::Panic));

        set_global_level(Level::Trace);
        assert!(is_enabled(Level::Trace));
    }
}
