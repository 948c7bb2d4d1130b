//! Canonical hook events emitted by a gateway to its host.
//!
//! Every event carries the identifier it is attributed to (`source`) and a
//! closed [`HookKind`]. Events produced on behalf of a host-side identity that
//! the foreign protocol cannot represent are flagged as `relay`, leaving the
//! host free to decide how third-party speech is shown.

use crate::{Sid, Uid};

/// Last-known state of a user, attached to removal events.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserInfo {
    /// Gateway identifier.
    pub uid: Uid,
    /// Display name at the time of the snapshot.
    pub nick: String,
    /// Ident/connection string.
    pub ident: String,
    /// Host string.
    pub host: String,
    /// Real name (GECOS).
    pub realname: String,
}

/// The payload of a canonical hook.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum HookKind {
    /// A user joined a channel.
    Join {
        /// Case-folded channel name.
        channel: String,
    },
    /// A user left a channel.
    Part {
        /// Case-folded channel name.
        channel: String,
        /// Part message, possibly empty.
        reason: String,
    },
    /// A user disconnected and was removed.
    Quit {
        /// Quit message.
        reason: String,
        /// The user as it was before removal.
        user: UserInfo,
    },
    /// A PRIVMSG.
    Message {
        /// Channel name or user identifier.
        target: String,
        /// Message body.
        text: String,
    },
    /// A NOTICE.
    Notice {
        /// Channel name or user identifier.
        target: String,
        /// Message body.
        text: String,
    },
    /// A display name change.
    Nick {
        /// Previous display name.
        old_nick: String,
        /// New display name.
        new_nick: String,
    },
    /// A server and everything behind it went away.
    ServerQuit {
        /// The server that was split.
        target: Sid,
        /// Split reason.
        reason: String,
        /// `(uid, nick)` of every user removed with it.
        users: Vec<(Uid, String)>,
    },
    /// Several users were joined to a channel at once.
    Burst {
        /// Case-folded channel name.
        channel: String,
        /// Display names of the joined users.
        nicks: Vec<String>,
    },
    /// The ident of a non-internal client changed.
    ChangeIdent {
        /// Affected user.
        target: Uid,
        /// New ident.
        ident: String,
    },
    /// The host of a non-internal client changed.
    ChangeHost {
        /// Affected user.
        target: Uid,
        /// New host.
        host: String,
    },
    /// The real name of a non-internal client changed.
    ChangeRealname {
        /// Affected user.
        target: Uid,
        /// New real name.
        realname: String,
    },
    /// An internal client lost its nick to a foreign participant.
    NickCollide {
        /// The internal client that must give up its nick.
        target: Uid,
        /// The nick it held.
        nick: String,
    },
}

impl HookKind {
    /// Canonical hook name, as registered on a host hook bus.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "JOIN",
            Self::Part { .. } => "PART",
            Self::Quit { .. } => "QUIT",
            Self::Message { .. } => "PRIVMSG",
            Self::Notice { .. } => "NOTICE",
            Self::Nick { .. } => "NICK",
            Self::ServerQuit { .. } => "SQUIT",
            Self::Burst { .. } => "SJOIN",
            Self::ChangeIdent { .. } => "CHGIDENT",
            Self::ChangeHost { .. } => "CHGHOST",
            Self::ChangeRealname { .. } => "CHGNAME",
            Self::NickCollide { .. } => "NICKCOLLIDE",
        }
    }
}

/// One canonical event for the host hook bus.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HookEvent {
    /// Identifier (uid or sid) the event is attributed to.
    pub source: String,
    /// What happened.
    pub kind: HookKind,
    /// Set when the event re-expresses an outbound command the foreign
    /// protocol cannot carry.
    pub relay: bool,
}

impl HookEvent {
    /// Build a canonical (non-relay) event.
    pub fn new(source: impl Into<String>, kind: HookKind) -> Self {
        Self {
            source: source.into(),
            kind,
            relay: false,
        }
    }

    /// Build a relay event.
    pub fn relay(source: impl Into<String>, kind: HookKind) -> Self {
        Self {
            source: source.into(),
            kind,
            relay: true,
        }
    }

    /// Hook name with the relay namespace applied (`RELAY_PRIVMSG`, ...).
    pub fn hook_name(&self) -> String {
        if self.relay {
            format!("RELAY_{}", self.kind.name())
        } else {
            self.kind.name().to_string()
        }
    }
}
