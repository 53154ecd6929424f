//! Testing utilities for topiclog
//!
//! Provides in-memory writers for asserting on what the engine wrote, and a
//! lock for tests that reconfigure the process-wide level gate.

mod capture;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use capture::{CaptureWriter, FailingWriter};

static GATE_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that build engines or otherwise change the level gate.
///
/// The gate is process-wide, and the test harness runs tests on parallel
/// threads; hold the guard for the whole test.
pub fn gate_lock() -> MutexGuard<'static, ()> {
    GATE_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
