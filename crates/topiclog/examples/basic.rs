//! Console plus rotating-file logging with two topics.
//!
//! Run with `cargo run -p topiclog --example basic`; JSON lines land in
//! `./logs/logs`, rotated at 2 MB with one compressed backup kept.

use std::error::Error;
use std::io;

use topiclog::{Engine, EngineConfig, Level, RotatingFileWriter, fields};

fn main() -> Result<(), Box<dyn Error>> {
    let config = EngineConfig {
        console: true,
        file_writer: Some(Box::new(RotatingFileWriter::new("./logs/logs", 2, 1, true)?)),
        level: Level::Info,
        ..EngineConfig::default()
    };
    let engine = Engine::new(config)?;

    let foo = engine.sub("Foo");
    let bar = engine.sub("Bar");

    let detail = io::Error::other("error detail");
    foo.error(
        "unable to create the foo in database",
        Some(&detail),
        fields! { "name" => "sample field of the error call" },
    );
    foo.warn(
        "unable to create the foo in database",
        fields! { "name" => "sample field of the warn call" },
    );
    foo.info(
        "hello world hello world hello world",
        fields! { "name" => "sample field of the info call" },
    );

    // Below the Info gate: neither reaches a sink
    bar.debug(
        "debug detail debug detail",
        fields! { "name" => "sample field of the debug call" },
    );
    bar.trace(
        "trace detail trace detail",
        fields! { "name" => "sample field of the trace call" },
    );

    engine.flush()?;
    Ok(())
}
