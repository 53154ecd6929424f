//! Concurrent logging from many threads through one engine.

use std::collections::HashSet;
use std::thread;

use topiclog::testing::{CaptureWriter, gate_lock};
use topiclog::{ConsoleStyle, Engine, EngineConfig, Level, fields};

const THREADS: usize = 8;
const CALLS: usize = 250;

#[test]
fn test_every_record_arrives_whole_on_every_sink() {
    let _gate = gate_lock();
    let console = CaptureWriter::new();
    let file = CaptureWriter::new();
    let engine = Engine::new(
        EngineConfig::builder()
            .console_writer(console.clone())
            .console_style(ConsoleStyle::Plain)
            .file_writer(file.clone())
            .level(Level::Info)
            .build(),
    )
    .unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let log = engine.sub(format!("worker-{t}"));
            thread::spawn(move || {
                for i in 0..CALLS {
                    log.info(
                        "working through the queue",
                        fields! { "thread" => t.to_string(), "seq" => i.to_string() },
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = THREADS * CALLS;

    // One write call per record, each exactly one line
    for capture in [&console, &file] {
        let writes = capture.writes();
        assert_eq!(writes.len(), expected);
        for chunk in &writes {
            assert_eq!(chunk.last(), Some(&b'\n'));
            assert_eq!(chunk.iter().filter(|b| **b == b'\n').count(), 1);
        }
    }

    let seen: HashSet<(String, String)> = file
        .json_records()
        .iter()
        .map(|record| {
            let thread = record["thread"].as_str().unwrap().to_string();
            assert_eq!(record["topic"], format!("worker-{thread}"));
            (thread, record["seq"].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(seen.len(), expected);

    console.assert_line_count(expected);
    assert_eq!(engine.write_error_count(), 0);
}

#[test]
fn test_cloned_sub_loggers_across_threads() {
    let _gate = gate_lock();
    let file = CaptureWriter::new();
    let engine = Engine::new(
        EngineConfig::builder()
            .file_writer(file.clone())
            .level(Level::Debug)
            .build(),
    )
    .unwrap();
    let shared = engine.sub("shared");

    thread::scope(|scope| {
        for t in 0..THREADS {
            let log = shared.clone();
            scope.spawn(move || {
                for i in 0..CALLS {
                    log.debug("tick", fields! { "id" => format!("{t}-{i}") });
                }
            });
        }
    });

    let records = file.json_records();
    assert_eq!(records.len(), THREADS * CALLS);
    assert!(records.iter().all(|r| r["topic"] == "shared"));
}
