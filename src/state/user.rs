//! Virtual user records.

use std::collections::HashSet;

use bridge_proto::UserInfo;

use super::uid::{Sid, Uid};

/// Who introduced a user into the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Spawned for a participant seen on the foreign link.
    Foreign,
    /// Spawned by the host (relay clients, the gateway's own identity).
    Host,
}

/// A user mirrored locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualUser {
    pub uid: Uid,
    pub nick: String,
    pub ident: String,
    pub host: String,
    pub realname: String,
    /// Owning server.
    pub server: Sid,
    /// Channels this user is in (case-folded names).
    pub channels: HashSet<String>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    pub alive: bool,
    pub manipulatable: bool,
    pub origin: Origin,
    /// Case-folded foreign display name, for users of foreign origin.
    pub foreign_key: Option<String>,
}

/// Parameters for creating a new VirtualUser.
#[derive(Debug, Clone)]
pub struct UserParams {
    pub nick: String,
    pub ident: String,
    pub host: String,
    pub realname: String,
    pub manipulatable: bool,
    pub origin: Origin,
    pub foreign_key: Option<String>,
}

impl UserParams {
    /// Host-originated user with the given identity.
    pub fn host(
        nick: impl Into<String>,
        ident: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            ident: ident.into(),
            host: host.into(),
            realname: String::new(),
            manipulatable: false,
            origin: Origin::Host,
            foreign_key: None,
        }
    }
}

impl VirtualUser {
    pub(crate) fn new(uid: Uid, server: Sid, params: UserParams) -> Self {
        let UserParams {
            nick,
            ident,
            host,
            realname,
            manipulatable,
            origin,
            foreign_key,
        } = params;

        Self {
            uid,
            nick,
            ident,
            host,
            realname,
            server,
            channels: HashSet::new(),
            created_at: chrono::Utc::now().timestamp(),
            alive: true,
            manipulatable,
            origin,
            foreign_key,
        }
    }

    /// Whether this user stands in for a foreign participant.
    pub fn is_foreign(&self) -> bool {
        self.origin == Origin::Foreign
    }

    pub fn info(&self) -> UserInfo {
        UserInfo {
            uid: self.uid.clone(),
            nick: self.nick.clone(),
            ident: self.ident.clone(),
            host: self.host.clone(),
            realname: self.realname.clone(),
        }
    }
}
