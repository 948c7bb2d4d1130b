//! Telemetry utilities for event timing and log correlation.

use std::time::Instant;

use tracing::trace;

/// Guard for timing the handling of one event.
///
/// Records the elapsed time at `trace` level when dropped.
pub struct EventTimer {
    event: &'static str,
    start: Instant,
}

impl EventTimer {
    /// Start timing an event.
    pub fn new(event: &'static str) -> Self {
        Self {
            event,
            start: Instant::now(),
        }
    }
}

impl Drop for EventTimer {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        trace!(event = self.event, micros, "Event handled");
    }
}

/// Standardized span constructors for gateway observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one foreign link.
    pub fn link(network: &str, address: &str) -> Span {
        info_span!("link", network = %network, address = %address)
    }

    /// Create a span for one inbound foreign event.
    pub fn inbound(event: &str) -> Span {
        info_span!("inbound", event = %event)
    }

    /// Create a span for one outbound command.
    pub fn outbound(command: &str, source: Option<&str>) -> Span {
        if let Some(source) = source {
            info_span!("outbound", command = %command, source = %source)
        } else {
            info_span!("outbound", command = %command)
        }
    }
}
