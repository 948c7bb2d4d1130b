//! Foreign transports.
//!
//! A transport owns the wire. It delivers foreign events into the channel
//! handed to [`Transport::start`], in arrival order, and raises the
//! [`AbortLatch`] when the connection is lost.

mod codec;
mod line;

pub use codec::{ForeignLineCodec, RawLine};
pub use line::LineTransport;

use async_trait::async_trait;
use bridge_proto::{ForeignAction, ForeignEvent};
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::link::AbortLatch;

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Connect and complete the foreign handshake.
    ///
    /// Returns once the link is usable. Events flow into `events` until the
    /// transport is stopped or the connection drops, at which point `latch`
    /// is set.
    async fn start(
        &self,
        events: mpsc::Sender<ForeignEvent>,
        latch: AbortLatch,
    ) -> Result<(), TransportError>;

    /// Send one action under the gateway's identity.
    async fn send(&self, action: ForeignAction) -> Result<(), TransportError>;

    /// Close the connection. Idempotent; never sets the latch.
    async fn stop(&self);
}
