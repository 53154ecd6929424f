//! Core types for topiclog.
//!
//! This crate provides the data model shared by every topiclog crate:
//! - [`Level`] and the process-wide level gate
//! - [`Fields`] attached to a single log call
//! - [`LogRecord`], the immutable entry produced per call, and its JSON form
//! - Error types for level parsing and sink writes
//!
//! It performs no I/O; sinks and the engine live in the `topiclog` crate.

#![forbid(unsafe_code)]

mod error;
pub mod fields;
pub mod gate;
pub mod level;
pub mod record;

pub use error::{ParseLevelError, SinkError, SinkResult};
pub use fields::Fields;
pub use gate::{global_level, is_enabled, set_global_level};
pub use level::Level;
pub use record::{LogRecord, error_chain};
