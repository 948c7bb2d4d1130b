//! Virtual server records.

use std::collections::HashSet;

use super::uid::{Sid, Uid};

/// A server mirrored locally: the gateway's root, or one spawned behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualServer {
    pub sid: Sid,
    /// Lower-cased server name.
    pub name: String,
    pub description: String,
    /// The server that introduced this one. `None` only for the root.
    pub uplink: Option<Sid>,
    /// Users owned by this server.
    pub users: HashSet<Uid>,
    /// Synthetic server with a virtualized SID.
    pub internal: bool,
}

impl VirtualServer {
    pub(crate) fn new(
        sid: Sid,
        name: &str,
        description: String,
        uplink: Option<Sid>,
        internal: bool,
    ) -> Self {
        Self {
            sid,
            name: name.to_ascii_lowercase(),
            description,
            uplink,
            users: HashSet::new(),
            internal,
        }
    }

    pub fn is_root(&self) -> bool {
        self.uplink.is_none()
    }
}
