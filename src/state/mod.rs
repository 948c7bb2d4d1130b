//! State management module.
//!
//! Contains the entity mirror (users, servers, channels of the bridged
//! network) and the identifier virtualizer backing it.

mod channel;
mod mirror;
mod server;
mod uid;
mod user;

pub use channel::Channel;
pub use mirror::{EntityMirror, FieldChange, MirrorResult, MirrorStats, SplitSnapshot};
pub use server::VirtualServer;
pub use uid::{IdClass, IdVirtualizer, Sid, Uid};
pub use user::{Origin, UserParams, VirtualUser};
