//! Log verbosity levels.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Verbosity threshold for the access gate.
///
/// Ordered `None < Error < Info < Debug`. A threshold enables every level at
/// or below itself, so `Info` lets `Error` and `Info` events through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    /// Nothing is logged.
    None = 0,
    /// Failures of the remote check only.
    #[default]
    Error = 1,
    /// Decisions and validation failures.
    Info = 2,
    /// Request and response details.
    Debug = 3,
}

impl LogLevel {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Some(Self::None),
            "error" => Some(Self::Error),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    /// Whether an event at `level` passes this threshold.
    pub fn enables(self, level: LogLevel) -> bool {
        level != LogLevel::None && level <= self
    }

    /// Lowercase name, as accepted by [`LogLevel::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Error => "error",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Error,
            2 => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::None => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

/// A threshold that can be changed while other threads read it.
///
/// Clones share the same underlying value. Reads and writes are relaxed: a
/// concurrent reader sees either the old or the new level.
#[derive(Debug, Clone)]
pub struct SharedLevel {
    inner: Arc<AtomicU8>,
}

impl SharedLevel {
    /// Create a shared threshold starting at `level`.
    pub fn new(level: LogLevel) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    /// Current threshold.
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.load(Ordering::Relaxed))
    }

    /// Replace the threshold.
    pub fn set(&self, level: LogLevel) {
        self.inner.store(level as u8, Ordering::Relaxed);
    }
}

impl Default for SharedLevel {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}
