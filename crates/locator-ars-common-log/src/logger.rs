//! The logger capability used by the access gate.

use crate::level::{LogLevel, SharedLevel};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// A leveled diagnostic sink.
///
/// Implementations must never panic: log calls are made on the request path
/// and their failures are swallowed.
pub trait Logger: Send + Sync {
    /// Request and response details.
    fn debug(&self, args: fmt::Arguments<'_>);
    /// Decisions and validation failures.
    fn info(&self, args: fmt::Arguments<'_>);
    /// Failures of the remote check.
    fn error(&self, args: fmt::Arguments<'_>);
}

impl<L: Logger + ?Sized> Logger for &L {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args)
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}

impl<L: Logger + ?Sized> Logger for Arc<L> {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args)
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }
}

/// Log a debug event through a [`Logger`].
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::debug(&$logger, format_args!($($arg)+))
    };
}

/// Log an info event through a [`Logger`].
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::info(&$logger, format_args!($($arg)+))
    };
}

/// Log an error event through a [`Logger`].
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::Logger::error(&$logger, format_args!($($arg)+))
    };
}

enum Sink {
    Stdout,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Logger writing timestamped lines, filtered by a live threshold.
///
/// Lines look like `[2024-05-01 12:00:00.000] [INFO] message`. The threshold
/// may be changed at any time through [`DefaultLogger::set_level`], including
/// while other threads are logging.
pub struct DefaultLogger {
    level: SharedLevel,
    sink: Sink,
}

impl DefaultLogger {
    /// Create a logger writing to stdout.
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: SharedLevel::new(level),
            sink: Sink::Stdout,
        }
    }

    /// Create a logger writing to an arbitrary stream.
    pub fn with_writer(level: LogLevel, writer: impl Write + Send + 'static) -> Self {
        Self {
            level: SharedLevel::new(level),
            sink: Sink::Writer(Mutex::new(Box::new(writer))),
        }
    }

    /// Current threshold.
    pub fn level(&self) -> LogLevel {
        self.level.get()
    }

    /// Change the threshold. Takes effect for the next event.
    pub fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    fn write(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.level.get().enables(level) {
            return;
        }

        let line = format_line(level, args);
        let _ = match &self.sink {
            Sink::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            Sink::Writer(writer) => writer.lock().write_all(line.as_bytes()),
        };
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl fmt::Debug for DefaultLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultLogger")
            .field("level", &self.level.get())
            .finish_non_exhaustive()
    }
}

impl Logger for DefaultLogger {
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Info, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.write(LogLevel::Error, args);
    }
}

fn format_line(level: LogLevel, args: fmt::Arguments<'_>) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let tag = match level {
        LogLevel::Debug => "DEBUG",
        LogLevel::Info => "INFO",
        LogLevel::Error | LogLevel::None => "ERROR",
    };
    format!("[{}] [{}] {}\n", timestamp, tag, args)
}

/// Logger forwarding to `tracing` events under the `locator_ars` target.
///
/// Filtering is left to the installed subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "locator_ars", "{}", args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "locator_ars", "{}", args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: "locator_ars", "{}", args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(String::from)
                .collect()
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_line_format() {
        let buffer = Buffer::default();
        let logger = DefaultLogger::with_writer(LogLevel::Info, buffer.clone());

        log_info!(logger, "access granted for action={}", "view");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("[INFO] access granted for action=view"));
    }

    #[test]
    fn test_threshold_filters_events() {
        let buffer = Buffer::default();
        let logger = DefaultLogger::with_writer(LogLevel::Error, buffer.clone());

        log_debug!(logger, "debug");
        log_info!(logger, "info");
        log_error!(logger, "error");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[ERROR] error"));
    }

    #[test]
    fn test_none_silences_everything() {
        let buffer = Buffer::default();
        let logger = DefaultLogger::with_writer(LogLevel::None, buffer.clone());

        log_error!(logger, "error");

        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_set_level_applies_to_next_event() {
        let buffer = Buffer::default();
        let logger = DefaultLogger::with_writer(LogLevel::Error, buffer.clone());

        log_debug!(logger, "hidden");
        logger.set_level(LogLevel::Debug);
        log_debug!(logger, "shown");

        assert_eq!(logger.level(), LogLevel::Debug);
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[DEBUG] shown"));
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        let logger = DefaultLogger::with_writer(LogLevel::Debug, FailingWriter);
        log_error!(logger, "still fine");
    }

    #[test]
    fn test_logger_through_arc_dyn() {
        let buffer = Buffer::default();
        let logger: Arc<dyn Logger> =
            Arc::new(DefaultLogger::with_writer(LogLevel::Debug, buffer.clone()));

        log_debug!(logger, "via {}", "arc");

        assert!(buffer.lines()[0].contains("via arc"));
    }

    #[test]
    fn test_tracing_logger_without_subscriber() {
        let logger = TracingLogger;
        log_info!(logger, "no subscriber installed");
    }
}
