//! slirc-bridge - Straylight protocol bridge
//!
//! Mirrors a foreign chat network into an IRC services host. Participants
//! of the foreign network become virtual users under a virtual server;
//! their activity becomes canonical hook events, and canonical commands
//! from the host become foreign actions, relay hooks or documented no-ops.
//!
//! Module overview:
//! - `state`:     identifier virtualizer and the entity mirror
//! - `translate`: inbound and outbound event translation
//! - `link`:      connection lifecycle, abort latch, teardown cascade
//! - `transport`: the [`Transport`](transport::Transport) seam and the TCP line transport
//! - `hooks`:     hook sinks the gateway emits into
//! - `replay`:    chat log replay through a connected gateway

pub mod config;
pub mod error;
pub mod hooks;
pub mod link;
pub mod replay;
pub mod state;
pub mod telemetry;
pub mod translate;
pub mod transport;

pub use bridge_proto;
pub use config::Config;
pub use error::{ConnectError, GatewayError, MirrorError, TransportError};
pub use hooks::{ChannelSink, HookSink, TracingSink};
pub use link::{AbortLatch, Gateway, LinkState};
pub use translate::Outcome;
