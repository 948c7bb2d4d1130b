//! Mirrored channels.

use std::collections::HashSet;

use super::uid::Uid;

/// A foreign room mirrored as a channel.
///
/// Channels are created on first join and outlive their last member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    /// Case-folded name.
    pub name: String,
    pub users: HashSet<Uid>,
}

impl Channel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            users: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
