//! Rotating file writer for topiclog.
//!
//! Rotation itself is done by [`file_rotate`]; this crate fixes the
//! parameters topiclog exposes (size in megabytes, backup count, gzip) and
//! turns path problems into errors at open time instead of on the first
//! write.
//!
//! - The active file lives at the configured path
//! - Once a write takes it past `max_size`, the next write rotates first
//! - Backups sit beside it as `<name>.<YYYYMMDDTHHMMSS>[.N][.gz]`
//! - At most `max_backups` backups are kept, oldest deleted first
//!
//! # Example
//!
//! ```no_run
//! use std::io::Write;
//! use topiclog_rotate::RotatingFileWriter;
//!
//! let mut writer = RotatingFileWriter::builder("./logs/app.log")
//!     .max_size_mb(2)
//!     .max_backups(1)
//!     .compress(true)
//!     .open()?;
//! writer.write_all(b"{\"message\":\"hello\"}\n")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod writer;

pub use error::{Error, Result};
pub use writer::{DEFAULT_MAX_SIZE_MB, MEGABYTE, RotatingFileWriter, RotatingFileWriterBuilder};
