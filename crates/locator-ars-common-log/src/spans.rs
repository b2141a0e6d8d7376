//! Tracing spans and timing for access checks.

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{info_span, Instrument, Span};

/// Span covering one access check.
pub fn check_span(action: &str, scheme: &str) -> Span {
    info_span!("access_check", action = %action, scheme = %scheme)
}

/// Span covering one outbound call to the access service.
pub fn remote_span(endpoint: &str) -> Span {
    info_span!("access_service", endpoint = %endpoint)
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Wall-clock timer for an operation.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whole milliseconds since the timer started.
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    /// Complete the timer and emit the duration as a tracing event.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}
