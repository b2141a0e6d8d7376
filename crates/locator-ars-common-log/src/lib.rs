//! Logging infrastructure for locator-ars.
//!
//! The [`Logger`] capability the access gate reports through, with the
//! stdout [`DefaultLogger`] and the [`TracingLogger`] adapter, plus the spans
//! and timers wrapped around each access check.

pub mod level;
pub mod logger;
pub mod spans;

pub use level::{LogLevel, SharedLevel};
pub use logger::{DefaultLogger, Logger, TracingLogger};
