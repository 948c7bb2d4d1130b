//! Hook sinks.
//!
//! The gateway never calls into the host directly. Every canonical event is
//! handed to an injected [`HookSink`], which must not block.

use bridge_proto::HookEvent;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Receiver of canonical hook events.
///
/// Called from the inbound pump and from outbound command handling, in
/// emission order. Delivery is fire-and-forget.
pub trait HookSink: Send + Sync {
    fn emit(&self, event: HookEvent);
}

/// Forwards events into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<HookEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver the host drains it from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HookEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl HookSink for ChannelSink {
    fn emit(&self, event: HookEvent) {
        if self.tx.send(event).is_err() {
            warn!("Hook receiver dropped, discarding event");
        }
    }
}

/// Logs every event as a JSON line at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl HookSink for TracingSink {
    fn emit(&self, event: HookEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => info!(
                hook = %event.hook_name(),
                source = %event.source,
                event = %json,
                "Hook"
            ),
            Err(e) => warn!(hook = %event.hook_name(), error = %e, "Hook not serializable"),
        }
    }
}
