//! Integration with the `log` and `tracing` ecosystems.
//!
//! Both bridges write into an [`crate::Engine`]'s sinks and honour its
//! process-wide level gate. The `log` target or tracing target becomes the
//! record's topic.

mod log_bridge;
mod tracing_layer;

pub use log_bridge::LogBridge;
pub use tracing_layer::{TopicLayer, TopicSubscriberBuilder, level_from_tracing};
