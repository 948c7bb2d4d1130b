//! The entity state mirror.
//!
//! Owns the user, server and channel tables of one bridged connection. All
//! three tables sit behind a single lock so that every operation keeps the
//! cross-table invariants (user ↔ server ownership, user ↔ channel
//! membership) atomically. Callers only ever get clones out.

use std::collections::{HashMap, HashSet};

use bridge_proto::{Casemapping, Field};
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::channel::Channel;
use super::server::VirtualServer;
use super::uid::{IdClass, IdVirtualizer, Sid, Uid};
use super::user::{Origin, UserParams, VirtualUser};
use crate::error::MirrorError;

pub type MirrorResult<T> = Result<T, MirrorError>;

/// Everything removed by a server cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSnapshot {
    /// Removed servers, the split server first.
    pub servers: Vec<Sid>,
    /// Removed users as they were just before removal.
    pub users: Vec<VirtualUser>,
}

impl SplitSnapshot {
    /// `(uid, nick)` of every removed user.
    pub fn removed_users(&self) -> Vec<(Uid, String)> {
        self.users
            .iter()
            .map(|u| (u.uid.clone(), u.nick.clone()))
            .collect()
    }
}

/// Result of [`EntityMirror::update_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Unchanged,
    Changed { old: String },
}

/// Table sizes, for status queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStats {
    pub users: usize,
    pub servers: usize,
    pub channels: usize,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uid, VirtualUser>,
    servers: HashMap<Sid, VirtualServer>,
    channels: HashMap<String, Channel>,
    /// Folded nick -> uid.
    nicks: HashMap<String, Uid>,
    /// Folded foreign display name -> uid.
    foreign: HashMap<String, Uid>,
}

impl Tables {
    fn remove_user(&mut self, uid: &str, casemapping: Casemapping) -> Option<VirtualUser> {
        let mut user = self.users.remove(uid)?;

        for chan in &user.channels {
            if let Some(channel) = self.channels.get_mut(chan) {
                channel.users.remove(uid);
            }
        }
        if let Some(server) = self.servers.get_mut(&user.server) {
            server.users.remove(uid);
        }
        let nick = casemapping.fold(&user.nick);
        if self.nicks.get(&nick).is_some_and(|holder| holder == uid) {
            self.nicks.remove(&nick);
        }
        if let Some(key) = &user.foreign_key {
            self.foreign.remove(key);
        }

        user.alive = false;
        Some(user)
    }

    /// The target server followed by every server routed through it.
    fn downstream(&self, target: &str) -> Vec<Sid> {
        let mut result = Vec::new();
        let mut to_process = vec![target.to_string()];
        let mut processed = HashSet::new();

        while let Some(current) = to_process.pop() {
            if !processed.insert(current.clone()) {
                continue;
            }
            result.push(current.clone());

            for server in self.servers.values() {
                if server.uplink.as_deref() == Some(current.as_str())
                    && !processed.contains(&server.sid)
                {
                    to_process.push(server.sid.clone());
                }
            }
        }

        result
    }
}

/// Mirrored view of the remote network.
#[derive(Debug)]
pub struct EntityMirror {
    ids: IdVirtualizer,
    casemapping: Casemapping,
    tables: RwLock<Tables>,
}

impl EntityMirror {
    pub fn new(casemapping: Casemapping) -> Self {
        Self {
            ids: IdVirtualizer::new(),
            casemapping,
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Fold a nick or channel name with this mirror's case mapping.
    pub fn fold(&self, name: &str) -> String {
        self.casemapping.fold(name)
    }

    // ------------------------------------------------------------------
    // Servers
    // ------------------------------------------------------------------

    /// Register a server.
    ///
    /// Internal servers get a virtualized SID; others use their lower-cased
    /// name. Only one root (`uplink = None`) may exist at a time.
    pub fn create_server(
        &self,
        name: &str,
        uplink: Option<&str>,
        internal: bool,
        description: impl Into<String>,
    ) -> MirrorResult<Sid> {
        let mut tables = self.tables.write();

        match uplink {
            Some(up) if !tables.servers.contains_key(up) => {
                return Err(MirrorError::UnknownServer(up.to_string()));
            }
            None if tables.servers.values().any(VirtualServer::is_root) => {
                return Err(MirrorError::DuplicateServer(name.to_string()));
            }
            _ => {}
        }

        let sid = if internal {
            self.ids.allocate(IdClass::Server, name)
        } else {
            name.to_ascii_lowercase()
        };
        if tables.servers.contains_key(&sid) {
            return Err(MirrorError::DuplicateServer(sid));
        }

        let server = VirtualServer::new(
            sid.clone(),
            name,
            description.into(),
            uplink.map(str::to_string),
            internal,
        );
        tables.servers.insert(sid.clone(), server);
        debug!(sid = %sid, name = %name, "Server registered");
        Ok(sid)
    }

    /// Remove a server and, recursively, every server and user behind it.
    pub fn remove_server(&self, sid: &str) -> MirrorResult<SplitSnapshot> {
        let mut tables = self.tables.write();
        if !tables.servers.contains_key(sid) {
            return Err(MirrorError::UnknownServer(sid.to_string()));
        }

        let affected = tables.downstream(sid);
        let mut snapshot = SplitSnapshot::default();

        for server_sid in &affected {
            let owned: Vec<Uid> = tables
                .servers
                .get(server_sid)
                .map(|s| s.users.iter().cloned().collect())
                .unwrap_or_default();
            for uid in owned {
                if let Some(user) = tables.remove_user(&uid, self.casemapping) {
                    snapshot.users.push(user);
                }
            }
        }
        for server_sid in &affected {
            tables.servers.remove(server_sid);
        }
        snapshot.servers = affected;

        debug!(
            sid = %sid,
            servers_removed = snapshot.servers.len(),
            users_removed = snapshot.users.len(),
            "Server cascade complete"
        );
        Ok(snapshot)
    }

    pub fn server(&self, sid: &str) -> Option<VirtualServer> {
        self.tables.read().servers.get(sid).cloned()
    }

    /// The root server, if one is registered.
    pub fn root(&self) -> Option<Sid> {
        self.tables
            .read()
            .servers
            .values()
            .find(|s| s.is_root())
            .map(|s| s.sid.clone())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Register a user under `server`.
    pub fn create_user(&self, server: &str, params: UserParams) -> MirrorResult<Uid> {
        let mut tables = self.tables.write();
        if !tables.servers.contains_key(server) {
            return Err(MirrorError::UnknownServer(server.to_string()));
        }

        let folded = self.fold(&params.nick);
        if tables.nicks.contains_key(&folded) {
            return Err(MirrorError::NickInUse(params.nick));
        }
        if let Some(key) = &params.foreign_key
            && tables.foreign.contains_key(key)
        {
            return Err(MirrorError::DuplicateUser(key.clone()));
        }

        let uid = self.ids.allocate(IdClass::User, &params.nick);
        let user = VirtualUser::new(uid.clone(), server.to_string(), params);

        tables.nicks.insert(folded, uid.clone());
        if let Some(key) = &user.foreign_key {
            tables.foreign.insert(key.clone(), uid.clone());
        }
        if let Some(srv) = tables.servers.get_mut(server) {
            srv.users.insert(uid.clone());
        }
        debug!(uid = %uid, nick = %user.nick, server = %server, "User registered");
        tables.users.insert(uid.clone(), user);
        Ok(uid)
    }

    /// Remove a user from every channel and from its server.
    pub fn remove_user(&self, uid: &str) -> MirrorResult<VirtualUser> {
        self.tables
            .write()
            .remove_user(uid, self.casemapping)
            .ok_or_else(|| MirrorError::UnknownUser(uid.to_string()))
    }

    pub fn user(&self, uid: &str) -> Option<VirtualUser> {
        self.tables.read().users.get(uid).cloned()
    }

    pub fn nick_to_uid(&self, nick: &str) -> Option<Uid> {
        self.tables.read().nicks.get(&self.fold(nick)).cloned()
    }

    /// Look up the user standing in for a foreign participant.
    pub fn foreign_to_uid(&self, foreign_key: &str) -> Option<Uid> {
        self.tables.read().foreign.get(foreign_key).cloned()
    }

    /// Whether `uid` was spawned by the host rather than for a foreign participant.
    pub fn is_internal_client(&self, uid: &str) -> bool {
        self.tables
            .read()
            .users
            .get(uid)
            .is_some_and(|u| u.origin == Origin::Host)
    }

    /// Change the ident, host, display name or real name of a user.
    ///
    /// Re-announcing an unchanged value is a no-op.
    pub fn update_field(
        &self,
        uid: &str,
        field: Field,
        value: &str,
    ) -> MirrorResult<FieldChange> {
        let mut tables = self.tables.write();
        let current = {
            let user = tables
                .users
                .get(uid)
                .ok_or_else(|| MirrorError::UnknownUser(uid.to_string()))?;
            match field {
                Field::Ident => user.ident.clone(),
                Field::Host => user.host.clone(),
                Field::DisplayName => user.nick.clone(),
                Field::Realname => user.realname.clone(),
            }
        };
        if current == value {
            return Ok(FieldChange::Unchanged);
        }

        if field == Field::DisplayName {
            let new_folded = self.fold(value);
            if let Some(holder) = tables.nicks.get(&new_folded)
                && holder != uid
            {
                return Err(MirrorError::NickInUse(value.to_string()));
            }
            tables.nicks.remove(&self.fold(&current));
            tables.nicks.insert(new_folded, uid.to_string());
        }

        if let Some(user) = tables.users.get_mut(uid) {
            let slot = match field {
                Field::Ident => &mut user.ident,
                Field::Host => &mut user.host,
                Field::DisplayName => &mut user.nick,
                Field::Realname => &mut user.realname,
            };
            *slot = value.to_string();
        }
        trace!(uid = %uid, field = %field, "User field updated");
        Ok(FieldChange::Changed { old: current })
    }

    /// Re-key a foreign participant after a rename on the foreign side.
    pub fn rekey_foreign(&self, uid: &str, new_key: String) -> MirrorResult<()> {
        let mut tables = self.tables.write();
        let old_key = tables
            .users
            .get(uid)
            .ok_or_else(|| MirrorError::UnknownUser(uid.to_string()))?
            .foreign_key
            .clone();
        if let Some(holder) = tables.foreign.get(&new_key)
            && holder != uid
        {
            return Err(MirrorError::DuplicateUser(new_key));
        }
        if let Some(old) = old_key {
            tables.foreign.remove(&old);
        }
        tables.foreign.insert(new_key.clone(), uid.to_string());
        if let Some(user) = tables.users.get_mut(uid) {
            user.foreign_key = Some(new_key);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    /// Join a user to a channel, creating the channel if needed.
    ///
    /// Returns `false` if the user was already a member.
    pub fn join_channel(&self, uid: &str, channel: &str) -> MirrorResult<bool> {
        let name = self.fold(channel);
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(uid)
            .ok_or_else(|| MirrorError::UnknownUser(uid.to_string()))?;
        let added = user.channels.insert(name.clone());
        tables
            .channels
            .entry(name.clone())
            .or_insert_with(|| Channel::new(name))
            .users
            .insert(uid.to_string());
        Ok(added)
    }

    /// Part a user from a channel. Returns `false` if it was not a member.
    pub fn part_channel(&self, uid: &str, channel: &str, reason: &str) -> MirrorResult<bool> {
        let name = self.fold(channel);
        let mut tables = self.tables.write();
        let user = tables
            .users
            .get_mut(uid)
            .ok_or_else(|| MirrorError::UnknownUser(uid.to_string()))?;
        let removed = user.channels.remove(&name);
        if let Some(chan) = tables.channels.get_mut(&name) {
            chan.users.remove(uid);
        }
        trace!(uid = %uid, channel = %name, reason = %reason, removed, "Channel part");
        Ok(removed)
    }

    /// Join several users to one channel at once.
    ///
    /// Nothing is joined unless every user exists. Returns the nicks of the
    /// users that were not already members.
    pub fn burst_join(
        &self,
        server: &str,
        channel: &str,
        uids: &[Uid],
    ) -> MirrorResult<Vec<String>> {
        let name = self.fold(channel);
        let mut tables = self.tables.write();
        if !tables.servers.contains_key(server) {
            return Err(MirrorError::UnknownServer(server.to_string()));
        }
        if let Some(missing) = uids.iter().find(|u| !tables.users.contains_key(*u)) {
            return Err(MirrorError::UnknownUser(missing.clone()));
        }

        let mut joined = Vec::new();
        for uid in uids {
            if let Some(user) = tables.users.get_mut(uid)
                && user.channels.insert(name.clone())
            {
                joined.push(user.nick.clone());
            }
        }
        let chan = tables
            .channels
            .entry(name.clone())
            .or_insert_with(|| Channel::new(name));
        chan.users.extend(uids.iter().cloned());
        Ok(joined)
    }

    /// Drop a channel the foreign side destroyed. Returns its former members.
    pub fn destroy_channel(&self, channel: &str) -> Vec<Uid> {
        let name = self.fold(channel);
        let mut tables = self.tables.write();
        let Some(chan) = tables.channels.remove(&name) else {
            return Vec::new();
        };
        for uid in &chan.users {
            if let Some(user) = tables.users.get_mut(uid) {
                user.channels.remove(&name);
            }
        }
        chan.users.into_iter().collect()
    }

    pub fn channel(&self, name: &str) -> Option<Channel> {
        self.tables.read().channels.get(&self.fold(name)).cloned()
    }

    // ------------------------------------------------------------------
    // Whole-mirror
    // ------------------------------------------------------------------

    pub fn stats(&self) -> MirrorStats {
        let tables = self.tables.read();
        MirrorStats {
            users: tables.users.len(),
            servers: tables.servers.len(),
            channels: tables.channels.len(),
        }
    }

    /// Drop every table entry.
    pub fn clear(&self) {
        *self.tables.write() = Tables::default();
    }

    /// Check the cross-table invariants, describing the first violation.
    pub fn verify_consistency(&self) -> Result<(), String> {
        let tables = self.tables.read();

        for user in tables.users.values() {
            let Some(server) = tables.servers.get(&user.server) else {
                return Err(format!("{} owned by missing server {}", user.uid, user.server));
            };
            if !server.users.contains(&user.uid) {
                return Err(format!("{} not listed by server {}", user.uid, user.server));
            }
            for chan in &user.channels {
                if !tables
                    .channels
                    .get(chan)
                    .is_some_and(|c| c.users.contains(&user.uid))
                {
                    return Err(format!("{} claims {} but is not a member", user.uid, chan));
                }
            }
        }
        for chan in tables.channels.values() {
            for uid in &chan.users {
                if !tables
                    .users
                    .get(uid)
                    .is_some_and(|u| u.channels.contains(&chan.name))
                {
                    return Err(format!("{} lists {} which does not claim it", chan.name, uid));
                }
            }
        }
        for server in tables.servers.values() {
            if let Some(up) = &server.uplink
                && !tables.servers.contains_key(up)
            {
                return Err(format!("{} has missing uplink {}", server.sid, up));
            }
            for uid in &server.users {
                if !tables.users.contains_key(uid) {
                    return Err(format!("{} lists missing user {}", server.sid, uid));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror_with_root() -> (EntityMirror, Sid) {
        let mirror = EntityMirror::new(Casemapping::Ascii);
        let root = mirror
            .create_server("relay.int", None, true, "root")
            .unwrap();
        (mirror, root)
    }

    fn spawn(mirror: &EntityMirror, server: &str, nick: &str) -> Uid {
        mirror
            .create_user(server, UserParams::host(nick, "unknown", "unknown.host"))
            .unwrap()
    }

    #[test]
    fn create_user_requires_server() {
        let mirror = EntityMirror::new(Casemapping::Ascii);
        let err = mirror
            .create_user("nope", UserParams::host("a", "b", "c"))
            .unwrap_err();
        assert_eq!(err, MirrorError::UnknownServer("nope".into()));
    }

    #[test]
    fn only_one_root() {
        let (mirror, _) = mirror_with_root();
        assert!(matches!(
            mirror.create_server("other.int", None, true, ""),
            Err(MirrorError::DuplicateServer(_))
        ));
    }

    #[test]
    fn external_servers_use_their_name() {
        let (mirror, root) = mirror_with_root();
        let sid = mirror
            .create_server("Hub.Example", Some(&root), false, "")
            .unwrap();
        assert_eq!(sid, "hub.example");
        assert!(!mirror.server(&sid).unwrap().internal);
        assert!(matches!(
            mirror.create_server("hub.example", Some(&root), false, ""),
            Err(MirrorError::DuplicateServer(_))
        ));
    }

    #[test]
    fn nick_collision_is_rejected() {
        let (mirror, root) = mirror_with_root();
        spawn(&mirror, &root, "Bob");
        assert_eq!(
            mirror
                .create_user(&root, UserParams::host("BOB", "x", "y"))
                .unwrap_err(),
            MirrorError::NickInUse("BOB".into())
        );
    }

    #[test]
    fn join_and_part_keep_both_sides_in_sync() {
        let (mirror, root) = mirror_with_root();
        let a = spawn(&mirror, &root, "a");
        let b = spawn(&mirror, &root, "b");

        assert!(mirror.join_channel(&a, "#Town").unwrap());
        assert!(!mirror.join_channel(&a, "#town").unwrap());
        mirror.join_channel(&b, "#town").unwrap();
        mirror.verify_consistency().unwrap();

        assert!(mirror.part_channel(&a, "#TOWN", "bye").unwrap());
        assert!(!mirror.part_channel(&a, "#town", "again").unwrap());
        mirror.verify_consistency().unwrap();

        let chan = mirror.channel("#town").unwrap();
        assert_eq!(chan.users.len(), 1);
        assert!(chan.users.contains(&b));
    }

    #[test]
    fn empty_channels_persist() {
        let (mirror, root) = mirror_with_root();
        let a = spawn(&mirror, &root, "a");
        mirror.join_channel(&a, "#town").unwrap();
        mirror.part_channel(&a, "#town", "").unwrap();
        assert!(mirror.channel("#town").unwrap().is_empty());
    }

    #[test]
    fn join_unknown_user_fails() {
        let (mirror, _) = mirror_with_root();
        assert_eq!(
            mirror.join_channel("ghost", "#x").unwrap_err(),
            MirrorError::UnknownUser("ghost".into())
        );
        assert!(mirror.channel("#x").is_none());
    }

    #[test]
    fn remove_user_cleans_channels_and_server() {
        let (mirror, root) = mirror_with_root();
        let a = spawn(&mirror, &root, "a");
        mirror.join_channel(&a, "#one").unwrap();
        mirror.join_channel(&a, "#two").unwrap();

        let removed = mirror.remove_user(&a).unwrap();
        assert!(!removed.alive);
        assert_eq!(removed.channels.len(), 2);
        assert!(mirror.channel("#one").unwrap().is_empty());
        assert!(mirror.server(&root).unwrap().users.is_empty());
        assert!(mirror.nick_to_uid("a").is_none());
        assert_eq!(
            mirror.remove_user(&a).unwrap_err(),
            MirrorError::UnknownUser(a)
        );
    }

    #[test]
    fn remove_user_frees_only_its_folded_nick() {
        let mirror = EntityMirror::new(Casemapping::Rfc1459);
        let root = mirror.create_server("relay.int", None, true, "").unwrap();
        let bracket = spawn(&mirror, &root, "Bob[away]");
        let plain = spawn(&mirror, &root, "bob");

        mirror.remove_user(&bracket).unwrap();
        assert!(mirror.nick_to_uid("bob{AWAY}").is_none());
        assert_eq!(mirror.nick_to_uid("BOB"), Some(plain));
        assert_eq!(mirror.verify_consistency(), Ok(()));
    }

    #[test]
    fn remove_server_cascades_exactly() {
        let (mirror, root) = mirror_with_root();
        let hub = mirror.create_server("hub.int", Some(&root), true, "").unwrap();
        let leaf = mirror.create_server("leaf.int", Some(&hub), true, "").unwrap();
        let other = mirror.create_server("other.int", Some(&root), true, "").unwrap();

        let on_hub = [spawn(&mirror, &hub, "h1"), spawn(&mirror, &hub, "h2")];
        let on_leaf = spawn(&mirror, &leaf, "l1");
        let on_other = spawn(&mirror, &other, "o1");
        let on_root = spawn(&mirror, &root, "r1");
        for uid in on_hub.iter().chain([&on_leaf, &on_other]) {
            mirror.join_channel(uid, "#town").unwrap();
        }

        let split = mirror.remove_server(&hub).unwrap();
        let mut removed: Vec<_> = split.removed_users().into_iter().map(|(_, n)| n).collect();
        removed.sort();
        assert_eq!(removed, vec!["h1", "h2", "l1"]);
        assert_eq!(split.servers.len(), 2);
        assert_eq!(split.servers[0], hub);

        assert!(mirror.server(&hub).is_none());
        assert!(mirror.server(&leaf).is_none());
        assert!(mirror.user(&on_other).is_some());
        assert!(mirror.user(&on_root).is_some());
        let town = mirror.channel("#town").unwrap();
        assert_eq!(town.users.len(), 1);
        assert!(town.users.contains(&on_other));
        assert_eq!(mirror.stats().servers, 2);
        mirror.verify_consistency().unwrap();
    }

    #[test]
    fn update_field_reports_changes() {
        let (mirror, root) = mirror_with_root();
        let a = spawn(&mirror, &root, "a");

        assert_eq!(
            mirror.update_field(&a, Field::Host, "unknown.host").unwrap(),
            FieldChange::Unchanged
        );
        assert_eq!(
            mirror.update_field(&a, Field::Host, "new.host").unwrap(),
            FieldChange::Changed {
                old: "unknown.host".into()
            }
        );
        assert_eq!(mirror.user(&a).unwrap().host, "new.host");

        mirror.update_field(&a, Field::DisplayName, "alice").unwrap();
        assert_eq!(mirror.nick_to_uid("ALICE"), Some(a.clone()));
        assert!(mirror.nick_to_uid("a").is_none());

        spawn(&mirror, &root, "carol");
        assert_eq!(
            mirror.update_field(&a, Field::DisplayName, "Carol").unwrap_err(),
            MirrorError::NickInUse("Carol".into())
        );
    }

    #[test]
    fn burst_join_is_all_or_nothing() {
        let (mirror, root) = mirror_with_root();
        let a = spawn(&mirror, &root, "a");
        let err = mirror
            .burst_join(&root, "#town", &[a.clone(), "ghost".into()])
            .unwrap_err();
        assert_eq!(err, MirrorError::UnknownUser("ghost".into()));
        assert!(mirror.user(&a).unwrap().channels.is_empty());

        let b = spawn(&mirror, &root, "b");
        let joined = mirror.burst_join(&root, "#town", &[a, b]).unwrap();
        assert_eq!(joined.len(), 2);
        mirror.verify_consistency().unwrap();
    }

    #[test]
    fn destroy_channel_detaches_members() {
        let (mirror, root) = mirror_with_root();
        let a = spawn(&mirror, &root, "a");
        mirror.join_channel(&a, "#gone").unwrap();
        assert_eq!(mirror.destroy_channel("#GONE"), vec![a.clone()]);
        assert!(mirror.channel("#gone").is_none());
        assert!(mirror.user(&a).unwrap().channels.is_empty());
        mirror.verify_consistency().unwrap();
    }

    #[test]
    fn membership_stays_consistent_over_random_walk() {
        let (mirror, root) = mirror_with_root();
        let users: Vec<_> = (0..6).map(|i| spawn(&mirror, &root, &format!("u{i}"))).collect();
        let chans = ["#a", "#b", "#c"];
        // Deterministic pseudo-random sequence of joins and parts.
        let mut x: u32 = 17;
        for _ in 0..500 {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let uid = &users[(x >> 8) as usize % users.len()];
            let chan = chans[(x >> 16) as usize % chans.len()];
            if x & 1 == 0 {
                mirror.join_channel(uid, chan).unwrap();
            } else {
                mirror.part_channel(uid, chan, "").unwrap();
            }
            mirror.verify_consistency().unwrap();
        }
    }
}
