//! Canonical commands to foreign actions, relay hooks or no-ops.

use bridge_proto::{
    ChannelExt, Command, Field, ForeignAction, HookEvent, HookKind, NickExt, SpawnClient,
    SpawnServer,
};
use tracing::debug;

use super::caps::{Capability, capability};
use super::{Outbound, Outcome, Translator};
use crate::error::{GatewayError, GatewayResult, MirrorError};
use crate::state::{FieldChange, Origin, UserParams};

impl Translator {
    /// Translate one outbound command, updating the mirror to match.
    ///
    /// The returned [`Outbound`] carries the foreign action to send (only
    /// for speech by the primary identity) and the hooks to emit.
    pub fn translate_outbound(&self, cmd: Command) -> GatewayResult<Outbound> {
        match cmd {
            Command::SpawnClient(req) => self.spawn_client(req),
            Command::SpawnServer(req) => self.spawn_server(req),
            Command::Message {
                source,
                target,
                text,
                notice,
            } => self.message(source, target, text, notice),
            Command::Join { client, channel } => {
                check_channel(&channel)?;
                if !self.mirror.join_channel(&client, &channel)? {
                    return Ok(Outbound::no_op("already a member"));
                }
                let channel = self.mirror.fold(&channel);
                Ok(Outbound::relayed(vec![HookEvent::relay(
                    client,
                    HookKind::Join { channel },
                )]))
            }
            Command::Sjoin {
                server,
                channel,
                users,
            } => {
                check_channel(&channel)?;
                let nicks = self.mirror.burst_join(&server, &channel, &users)?;
                let channel = self.mirror.fold(&channel);
                Ok(Outbound::relayed(vec![HookEvent::relay(
                    server,
                    HookKind::Burst { channel, nicks },
                )]))
            }
            Command::Part {
                source,
                channel,
                reason,
            } => {
                if source == self.primary {
                    return Ok(Outbound::no_op("primary identity stays in its rooms"));
                }
                self.mirror.part_channel(&source, &channel, &reason)?;
                let channel = self.mirror.fold(&channel);
                Ok(Outbound::relayed(vec![HookEvent::relay(
                    source,
                    HookKind::Part { channel, reason },
                )]))
            }
            Command::Quit { source, reason } => {
                if source == self.primary {
                    return Ok(Outbound::no_op("primary identity leaves only with the link"));
                }
                let user = self.mirror.remove_user(&source)?;
                Ok(Outbound::relayed(vec![HookEvent::relay(
                    source,
                    HookKind::Quit {
                        reason,
                        user: user.info(),
                    },
                )]))
            }
            Command::Squit {
                source,
                target,
                reason,
            } => {
                if target == self.root {
                    return Ok(Outbound::no_op("root server leaves only with the link"));
                }
                let split = self.mirror.remove_server(&target)?;
                let users = split.removed_users();
                let hooks = if users.is_empty() {
                    Vec::new()
                } else {
                    vec![HookEvent::relay(
                        source,
                        HookKind::ServerQuit {
                            target,
                            reason,
                            users,
                        },
                    )]
                };
                Ok(Outbound::relayed(hooks))
            }
            Command::UpdateClient {
                target,
                field,
                value,
            } => self.update_client(target, field, value),
            other => Ok(unsupported(&other)),
        }
    }

    fn spawn_client(&self, req: SpawnClient) -> GatewayResult<Outbound> {
        if !req.nick.is_valid_nick() {
            return Err(GatewayError::InvalidNick(req.nick));
        }
        let server = req.server.unwrap_or_else(|| self.root.clone());
        let params = UserParams {
            nick: req.nick,
            ident: req.ident.unwrap_or_else(|| self.config.default_ident.clone()),
            host: req.host.unwrap_or_else(|| self.config.default_host.clone()),
            realname: req.realname.unwrap_or_default(),
            manipulatable: req.manipulatable,
            origin: Origin::Host,
            foreign_key: None,
        };
        let uid = self.mirror.create_user(&server, params)?;
        Ok(Outbound::with(Outcome::Spawned(uid), Vec::new()))
    }

    fn spawn_server(&self, req: SpawnServer) -> GatewayResult<Outbound> {
        let uplink = req.uplink.unwrap_or_else(|| self.root.clone());
        let sid = self.mirror.create_server(
            &req.name,
            Some(uplink.as_str()),
            req.internal,
            req.description.unwrap_or_default(),
        )?;
        Ok(Outbound::with(Outcome::ServerSpawned(sid), Vec::new()))
    }

    fn message(
        &self,
        source: String,
        target: String,
        text: String,
        notice: bool,
    ) -> GatewayResult<Outbound> {
        if source == self.primary {
            let target = self.expand_target(target);
            let action = if notice {
                ForeignAction::Notice { target, text }
            } else {
                ForeignAction::Say { target, text }
            };
            return Ok(Outbound {
                outcome: Outcome::Sent,
                action: Some(action),
                hooks: Vec::new(),
            });
        }

        if self.mirror.user(&source).is_none() {
            return Err(MirrorError::UnknownUser(source).into());
        }
        let kind = if notice {
            HookKind::Notice { target, text }
        } else {
            HookKind::Message { target, text }
        };
        Ok(Outbound::relayed(vec![HookEvent::relay(source, kind)]))
    }

    /// Virtual identifiers mean nothing on the wire; send the nick instead.
    fn expand_target(&self, target: String) -> String {
        match self.mirror.user(&target) {
            Some(user) => user.nick,
            None => target,
        }
    }

    fn update_client(
        &self,
        target: String,
        field: Field,
        value: String,
    ) -> GatewayResult<Outbound> {
        if field == Field::DisplayName && !value.is_valid_nick() {
            return Err(GatewayError::InvalidNick(value));
        }
        let change = self.mirror.update_field(&target, field, &value)?;

        let mut hooks = Vec::new();
        if let FieldChange::Changed { old } = &change
            && !self.mirror.is_internal_client(&target)
        {
            let event = match field {
                Field::Ident => HookEvent::new(
                    self.root.clone(),
                    HookKind::ChangeIdent {
                        target,
                        ident: value,
                    },
                ),
                Field::Host => HookEvent::new(
                    self.root.clone(),
                    HookKind::ChangeHost {
                        target,
                        host: value,
                    },
                ),
                Field::Realname => HookEvent::new(
                    self.root.clone(),
                    HookKind::ChangeRealname {
                        target,
                        realname: value,
                    },
                ),
                Field::DisplayName => HookEvent::new(
                    target,
                    HookKind::Nick {
                        old_nick: old.clone(),
                        new_nick: value,
                    },
                ),
            };
            hooks.push(event);
        }
        Ok(Outbound::with(Outcome::Updated(change), hooks))
    }
}

/// No-op for a command the capability table rules out.
fn unsupported(cmd: &Command) -> Outbound {
    let reason = match capability(cmd) {
        Capability::Unsupported(reason) => reason,
        Capability::Supported => "no translation",
    };
    debug!(command = cmd.name(), reason, "Command has no foreign equivalent");
    Outbound::no_op(reason)
}

fn check_channel(channel: &str) -> GatewayResult<()> {
    if channel.is_channel_name() {
        Ok(())
    } else {
        Err(GatewayError::InvalidChannel(channel.to_string()))
    }
}
