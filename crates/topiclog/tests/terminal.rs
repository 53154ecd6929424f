//! Fatal and panic calls.
//!
//! `fatal` ends the process, so those tests re-run this test binary as a
//! child filtered down to a single test, and inspect its exit status and the
//! file it logged to.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::{Command, ExitStatus};

use topiclog::testing::{CaptureWriter, gate_lock};
use topiclog::{Engine, EngineConfig, Fields, Level, fields};

const CHILD_OUTPUT: &str = "TOPICLOG_TERMINAL_CHILD_OUTPUT";

fn file_engine(path: &Path, level: Level) -> Engine {
    let file = fs::File::create(path).unwrap();
    Engine::new(
        EngineConfig::builder()
            .file_writer(file)
            .level(level)
            .build(),
    )
    .unwrap()
}

fn run_child(test_name: &str, output: &Path) -> ExitStatus {
    Command::new(std::env::current_exe().unwrap())
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_OUTPUT, output)
        .status()
        .unwrap()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_default()
}

// ============================================================================
// Fatal
// ============================================================================

#[test]
fn test_fatal_writes_then_exits_with_status_one() {
    if let Some(path) = std::env::var_os(CHILD_OUTPUT) {
        let engine = file_engine(Path::new(&path), Level::Info);
        engine
            .sub("Foo")
            .fatal("cannot continue", None, fields! { "stage" => "boot" });
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("fatal.log");
    let status = run_child("test_fatal_writes_then_exits_with_status_one", &output);
    assert_eq!(status.code(), Some(1));

    let contents = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(record["level"], "fatal");
    assert_eq!(record["topic"], "Foo");
    assert_eq!(record["message"], "cannot continue");
    assert_eq!(record["stage"], "boot");
}

#[test]
fn test_fatal_exits_even_when_suppressed() {
    if let Some(path) = std::env::var_os(CHILD_OUTPUT) {
        let engine = file_engine(Path::new(&path), Level::Disabled);
        engine.sub("Foo").fatal("silent", None, Fields::new());
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("fatal.log");
    let status = run_child("test_fatal_exits_even_when_suppressed", &output);
    assert_eq!(status.code(), Some(1));
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

// ============================================================================
// Panic
// ============================================================================

#[test]
fn test_panic_writes_then_unwinds_with_message() {
    let _gate = gate_lock();
    let capture = CaptureWriter::new();
    let engine = Engine::new(
        EngineConfig::builder()
            .file_writer(capture.clone())
            .level(Level::Info)
            .build(),
    )
    .unwrap();
    let log = engine.sub("Foo");

    let result: std::thread::Result<()> = panic::catch_unwind(AssertUnwindSafe(|| {
        log.panic("invariant broken", None, fields! { "id" => "7" });
    }));

    let payload = result.unwrap_err();
    assert_eq!(panic_message(payload.as_ref()), "invariant broken");

    let records = capture.json_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "panic");
    assert_eq!(records[0]["id"], "7");

    // Logging keeps working after the unwind
    log.info("still alive", Fields::new());
    assert_eq!(capture.json_records().len(), 2);
}

#[test]
fn test_panic_unwinds_even_when_suppressed() {
    let _gate = gate_lock();
    let capture = CaptureWriter::new();
    let engine = Engine::new(
        EngineConfig::builder()
            .file_writer(capture.clone())
            .level(Level::Disabled)
            .build(),
    )
    .unwrap();

    let result: std::thread::Result<()> = panic::catch_unwind(AssertUnwindSafe(|| {
        engine.sub("Foo").panic("quiet", None, Fields::new());
    }));

    assert!(result.is_err());
    assert_eq!(capture.write_count(), 0);
}

#[test]
#[should_panic(expected = "boom")]
fn test_panic_propagates_to_caller() {
    let _gate = gate_lock();
    let engine = Engine::new(
        EngineConfig::builder()
            .file_writer(CaptureWriter::new())
            .build(),
    )
    .unwrap();
    engine.sub("Foo").panic("boom", None, Fields::new());
}
