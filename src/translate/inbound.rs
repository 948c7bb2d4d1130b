//! Foreign events to canonical hooks.

use bridge_proto::{Field, ForeignEvent, HookEvent, HookKind};
use tracing::{debug, warn};

use super::Translator;
use super::normalize::{
    clean, foreign_key, is_usable_nick, normalize_channel, normalize_nick, with_suffix,
};
use crate::config::CollisionPolicy;
use crate::state::{FieldChange, Origin, Uid, UserParams};

const ROOM_CLOSED_REASON: &str = "Room closed";

impl Translator {
    /// Apply one foreign event to the mirror and return the hooks it produces.
    ///
    /// Never fails: events that cannot be mapped are logged and dropped.
    pub fn translate_inbound(&self, event: ForeignEvent) -> Vec<HookEvent> {
        let mut hooks = Vec::new();

        match event {
            ForeignEvent::Chat {
                sender,
                channel,
                text,
            } => self.speak(&sender, &channel, &mut hooks, |target| HookKind::Message {
                target,
                text,
            }),
            ForeignEvent::Emote {
                sender,
                channel,
                text,
            } => self.speak(&sender, &channel, &mut hooks, |target| HookKind::Message {
                target,
                text: format!("\x01ACTION {text}\x01"),
            }),
            ForeignEvent::Notice {
                sender,
                channel,
                text,
            } => self.speak(&sender, &channel, &mut hooks, |target| HookKind::Notice {
                target,
                text,
            }),
            ForeignEvent::Join { sender, channel } => {
                if let Some(channel) = self.channel_or_warn(&channel)
                    && let Some(uid) = self.resolve(&sender, &mut hooks)
                {
                    self.ensure_joined(&uid, &channel, &mut hooks);
                }
            }
            ForeignEvent::Leave { sender, channel } => self.leave(&sender, &channel, &mut hooks),
            ForeignEvent::Disconnect { sender, reason } => {
                self.disconnect(&sender, reason, &mut hooks)
            }
            ForeignEvent::Rename { old, new } => self.rename(&old, &new, &mut hooks),
            ForeignEvent::RoomClosed { channel } => self.close_room(&channel, &mut hooks),
            ForeignEvent::Malformed { raw, reason } => {
                warn!(raw = %raw, reason = %reason, "Dropping malformed foreign event");
            }
        }

        hooks
    }

    fn speak(
        &self,
        sender: &str,
        channel: &str,
        hooks: &mut Vec<HookEvent>,
        kind: impl FnOnce(String) -> HookKind,
    ) {
        let Some(channel) = self.channel_or_warn(channel) else {
            return;
        };
        let Some(uid) = self.resolve(sender, hooks) else {
            return;
        };
        let target = self.ensure_joined(&uid, &channel, hooks);
        hooks.push(HookEvent::new(uid, kind(target)));
    }

    fn leave(&self, sender: &str, channel: &str, hooks: &mut Vec<HookEvent>) {
        let Some(channel) = self.channel_or_warn(channel) else {
            return;
        };
        let Some(uid) = self.mirror.foreign_to_uid(&foreign_key(sender)) else {
            debug!(sender = %sender, "Leave from unknown participant");
            return;
        };
        match self.mirror.part_channel(&uid, &channel, "") {
            Ok(true) => hooks.push(HookEvent::new(
                uid,
                HookKind::Part {
                    channel: self.mirror.fold(&channel),
                    reason: String::new(),
                },
            )),
            Ok(false) => {}
            Err(e) => warn!(uid = %uid, error = %e, "Leave failed"),
        }
    }

    fn disconnect(&self, sender: &str, reason: String, hooks: &mut Vec<HookEvent>) {
        let Some(uid) = self.mirror.foreign_to_uid(&foreign_key(sender)) else {
            debug!(sender = %sender, "Disconnect from unknown participant");
            return;
        };
        match self.mirror.remove_user(&uid) {
            Ok(user) => {
                debug!(uid = %uid, nick = %user.nick, "Foreign participant left");
                hooks.push(HookEvent::new(
                    uid,
                    HookKind::Quit {
                        reason,
                        user: user.info(),
                    },
                ));
            }
            Err(e) => warn!(uid = %uid, error = %e, "Disconnect failed"),
        }
    }

    fn rename(&self, old: &str, new: &str, hooks: &mut Vec<HookEvent>) {
        let Some(uid) = self.mirror.foreign_to_uid(&foreign_key(old)) else {
            debug!(old = %old, new = %new, "Rename of unknown participant");
            return;
        };
        let Some(nick) = self.pick_nick(new, Some(uid.as_str()), hooks) else {
            return;
        };
        if let Err(e) = self.mirror.rekey_foreign(&uid, foreign_key(new)) {
            warn!(uid = %uid, error = %e, "Rename clashes with a known participant");
            return;
        }
        match self.mirror.update_field(&uid, Field::DisplayName, &nick) {
            Ok(change) => {
                if let FieldChange::Changed { old } = change {
                    hooks.push(HookEvent::new(
                        uid,
                        HookKind::Nick {
                            old_nick: old,
                            new_nick: nick,
                        },
                    ));
                }
            }
            Err(e) => warn!(uid = %uid, error = %e, "Rename failed"),
        }
    }

    fn close_room(&self, channel: &str, hooks: &mut Vec<HookEvent>) {
        let Some(channel) = self.channel_or_warn(channel) else {
            return;
        };
        let folded = self.mirror.fold(&channel);
        let mut members = self.mirror.destroy_channel(&channel);
        members.sort();
        debug!(channel = %folded, members = members.len(), "Foreign room closed");
        hooks.extend(members.into_iter().map(|uid| {
            HookEvent::new(
                uid,
                HookKind::Part {
                    channel: folded.clone(),
                    reason: ROOM_CLOSED_REASON.to_string(),
                },
            )
        }));
    }

    /// Join `uid` to `channel`, emitting JOIN for a new membership.
    /// Returns the folded channel name.
    fn ensure_joined(&self, uid: &str, channel: &str, hooks: &mut Vec<HookEvent>) -> String {
        let folded = self.mirror.fold(channel);
        match self.mirror.join_channel(uid, channel) {
            Ok(true) => hooks.push(HookEvent::new(
                uid,
                HookKind::Join {
                    channel: folded.clone(),
                },
            )),
            Ok(false) => {}
            Err(e) => warn!(uid = %uid, channel = %folded, error = %e, "Join failed"),
        }
        folded
    }

    fn channel_or_warn(&self, raw: &str) -> Option<String> {
        let channel = normalize_channel(raw);
        if channel.is_none() {
            warn!(channel = %raw, "Dropping event for invalid room name");
        }
        channel
    }

    /// Find or spawn the user standing in for a foreign participant.
    fn resolve(&self, sender: &str, hooks: &mut Vec<HookEvent>) -> Option<Uid> {
        let key = foreign_key(sender);
        if key.is_empty() {
            warn!(sender = %sender, "Dropping event with empty sender");
            return None;
        }
        if let Some(uid) = self.mirror.foreign_to_uid(&key) {
            return Some(uid);
        }
        if self.is_own_echo(&key) {
            debug!(sender = %sender, "Ignoring echo of own identity");
            return None;
        }

        let nick = self.pick_nick(sender, None, hooks)?;
        let params = UserParams {
            nick,
            ident: self.config.default_ident.clone(),
            host: self.config.default_host.clone(),
            realname: clean(sender).to_string(),
            manipulatable: false,
            origin: Origin::Foreign,
            foreign_key: Some(key),
        };
        match self.mirror.create_user(&self.root, params) {
            Ok(uid) => {
                debug!(uid = %uid, sender = %sender, "Spawned user for foreign participant");
                Some(uid)
            }
            Err(e) => {
                warn!(sender = %sender, error = %e, "Could not mirror foreign participant");
                None
            }
        }
    }

    fn is_own_echo(&self, key: &str) -> bool {
        self.mirror
            .user(&self.primary)
            .is_some_and(|p| p.nick.eq_ignore_ascii_case(key))
    }

    /// Choose a nick for a foreign name, applying the collision policy when
    /// it is held by someone other than `owner`.
    fn pick_nick(
        &self,
        raw: &str,
        owner: Option<&str>,
        hooks: &mut Vec<HookEvent>,
    ) -> Option<String> {
        let nick = normalize_nick(raw);
        if !is_usable_nick(&nick) {
            warn!(sender = %raw, nick = %nick, "Dropping event from unusable foreign name");
            return None;
        }

        let holder = match self.mirror.nick_to_uid(&nick) {
            None => return Some(nick),
            Some(holder) if Some(holder.as_str()) == owner => return Some(nick),
            Some(holder) => holder,
        };

        match self.config.collision {
            CollisionPolicy::Drop => {
                warn!(sender = %raw, nick = %nick, holder = %holder, "Nick in use, dropping event");
                None
            }
            CollisionPolicy::Collide if self.can_collide(&holder) => {
                self.collide(&holder, &nick, hooks).then_some(nick)
            }
            CollisionPolicy::Suffix | CollisionPolicy::Collide => {
                let suffixed = with_suffix(&nick, &self.config.collision_suffix);
                let free = self
                    .mirror
                    .nick_to_uid(&suffixed)
                    .is_none_or(|h| Some(h.as_str()) == owner);
                if free && is_usable_nick(&suffixed) {
                    Some(suffixed)
                } else {
                    warn!(
                        sender = %raw,
                        nick = %suffixed,
                        "Suffixed nick unavailable, dropping event"
                    );
                    None
                }
            }
        }
    }

    /// Host-spawned clients other than the primary identity lose collisions.
    fn can_collide(&self, holder: &str) -> bool {
        holder != self.primary && self.mirror.is_internal_client(holder)
    }

    /// Rename `holder` to its identifier so `nick` becomes free.
    fn collide(&self, holder: &str, nick: &str, hooks: &mut Vec<HookEvent>) -> bool {
        match self.mirror.update_field(holder, Field::DisplayName, holder) {
            Ok(_) => {
                debug!(uid = %holder, nick = %nick, "Nick-colliding virtual client");
                hooks.push(HookEvent::new(
                    self.root.clone(),
                    HookKind::NickCollide {
                        target: holder.to_string(),
                        nick: nick.to_string(),
                    },
                ));
                true
            }
            Err(e) => {
                warn!(uid = %holder, error = %e, "Nick collision failed");
                false
            }
        }
    }
}
