//! Canonical commands a host invokes on a protocol adapter.
//!
//! The set is closed: an adapter matches on [`Command`] exhaustively and
//! must give every variant a defined behaviour, even if that behaviour is to
//! do nothing.

use std::fmt;
use std::str::FromStr;

use crate::{Sid, Uid};

/// Parameters for spawning a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnClient {
    /// Requested display name.
    pub nick: String,
    /// Ident; the adapter default is used when absent.
    pub ident: Option<String>,
    /// Host; the adapter default is used when absent.
    pub host: Option<String>,
    /// Real name.
    pub realname: Option<String>,
    /// Owning server; the adapter's root server when absent.
    pub server: Option<Sid>,
    /// Whether other plugins may act on this client.
    pub manipulatable: bool,
}

impl SpawnClient {
    /// Spawn request with only a nick.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ..Default::default()
        }
    }
}

/// Parameters for spawning a server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnServer {
    /// Server name.
    pub name: String,
    /// Uplink; the adapter's root server when absent.
    pub uplink: Option<Sid>,
    /// Description line.
    pub description: Option<String>,
    /// Synthetic server (virtualized SID) rather than a foreign-native one.
    pub internal: bool,
}

/// Mutable client fields addressable by [`Command::UpdateClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Ident/connection string.
    Ident,
    /// Host string.
    Host,
    /// Display name.
    DisplayName,
    /// Real name (GECOS).
    Realname,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IDENT" => Ok(Self::Ident),
            "HOST" => Ok(Self::Host),
            "NICK" => Ok(Self::DisplayName),
            "REALNAME" | "GECOS" => Ok(Self::Realname),
            other => Err(format!("unknown client field: {other}")),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ident => "IDENT",
            Self::Host => "HOST",
            Self::DisplayName => "NICK",
            Self::Realname => "REALNAME",
        })
    }
}

/// A canonical outbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Introduce a client.
    SpawnClient(SpawnClient),
    /// Introduce a server.
    SpawnServer(SpawnServer),
    /// PRIVMSG or NOTICE.
    Message {
        /// Speaking client.
        source: Uid,
        /// Channel name or user identifier.
        target: String,
        /// Message body.
        text: String,
        /// Send as NOTICE.
        notice: bool,
    },
    /// Join a client to a channel.
    Join {
        /// Joining client.
        client: Uid,
        /// Channel name.
        channel: String,
    },
    /// Burst several clients into a channel.
    Sjoin {
        /// Server the burst is attributed to.
        server: Sid,
        /// Channel name.
        channel: String,
        /// Clients to join.
        users: Vec<Uid>,
    },
    /// Part a client from a channel.
    Part {
        /// Parting client.
        source: Uid,
        /// Channel name.
        channel: String,
        /// Part message.
        reason: String,
    },
    /// Remove a client.
    Quit {
        /// Quitting client.
        source: Uid,
        /// Quit message.
        reason: String,
    },
    /// Remove a server and everything behind it.
    Squit {
        /// Issuer.
        source: String,
        /// Server to remove.
        target: Sid,
        /// Split reason.
        reason: String,
    },
    /// Change a client's ident, host, nick or real name.
    UpdateClient {
        /// Client to change.
        target: Uid,
        /// Field to change.
        field: Field,
        /// New value.
        value: String,
    },
    /// Kick a client from a channel.
    Kick {
        /// Kicker.
        source: String,
        /// Channel name.
        channel: String,
        /// Kicked client.
        target: Uid,
        /// Kick reason.
        reason: String,
    },
    /// Set a channel topic.
    Topic {
        /// Setter.
        source: Uid,
        /// Channel name.
        channel: String,
        /// Topic text.
        text: String,
    },
    /// Burst a channel topic.
    TopicBurst {
        /// Server the burst is attributed to.
        server: Sid,
        /// Channel name.
        channel: String,
        /// Topic text.
        text: String,
    },
    /// Disconnect a client forcibly.
    Kill {
        /// Killer.
        source: String,
        /// Victim.
        target: Uid,
        /// Kill reason.
        reason: String,
    },
    /// Set or clear away status.
    Away {
        /// Client.
        source: Uid,
        /// Away text, `None` to clear.
        text: Option<String>,
    },
    /// Invite a client to a channel.
    Invite {
        /// Inviter.
        source: Uid,
        /// Invitee.
        target: Uid,
        /// Channel name.
        channel: String,
    },
    /// Knock on a channel.
    Knock {
        /// Knocking client.
        source: Uid,
        /// Channel name.
        channel: String,
        /// Knock text.
        text: String,
    },
    /// Send a numeric reply.
    Numeric {
        /// Server the reply is from.
        source: Sid,
        /// Numeric code.
        numeric: u16,
        /// Recipient.
        target: Uid,
        /// Reply text.
        text: String,
    },
    /// Change user or channel modes.
    Mode {
        /// Setter.
        source: String,
        /// Channel name or user identifier.
        target: String,
        /// Mode string, e.g. `+o Bob`.
        modes: String,
    },
}

impl Command {
    /// Canonical command name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SpawnClient(_) => "SPAWN_CLIENT",
            Self::SpawnServer(_) => "SPAWN_SERVER",
            Self::Message { notice: false, .. } => "PRIVMSG",
            Self::Message { notice: true, .. } => "NOTICE",
            Self::Join { .. } => "JOIN",
            Self::Sjoin { .. } => "SJOIN",
            Self::Part { .. } => "PART",
            Self::Quit { .. } => "QUIT",
            Self::Squit { .. } => "SQUIT",
            Self::UpdateClient { .. } => "UPDATE_CLIENT",
            Self::Kick { .. } => "KICK",
            Self::Topic { .. } => "TOPIC",
            Self::TopicBurst { .. } => "TOPIC_BURST",
            Self::Kill { .. } => "KILL",
            Self::Away { .. } => "AWAY",
            Self::Invite { .. } => "INVITE",
            Self::Knock { .. } => "KNOCK",
            Self::Numeric { .. } => "NUMERIC",
            Self::Mode { .. } => "MODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_parsing_accepts_gecos_alias() {
        assert_eq!("gecos".parse::<Field>(), Ok(Field::Realname));
        assert_eq!("REALNAME".parse::<Field>(), Ok(Field::Realname));
        assert_eq!("Host".parse::<Field>(), Ok(Field::Host));
        assert!("MODE".parse::<Field>().is_err());
        assert_eq!(Field::DisplayName.to_string(), "NICK");
    }

    #[test]
    fn message_name_depends_on_notice_flag() {
        let mut cmd = Command::Message {
            source: "a".into(),
            target: "#t".into(),
            text: "x".into(),
            notice: false,
        };
        assert_eq!(cmd.name(), "PRIVMSG");
        if let Command::Message { notice, .. } = &mut cmd {
            *notice = true;
        }
        assert_eq!(cmd.name(), "NOTICE");
    }
}
