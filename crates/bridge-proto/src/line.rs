//! The foreign chat link's line protocol.
//!
//! Every message is one UTF-8 line. Parameters are separated by single
//! spaces; a parameter starting with `:` swallows the rest of the line.
//!
//! Server to gateway:
//!
//! ```text
//! WELCOME
//! DENIED :<reason>
//! PING <token>
//! CHAT <sender> <channel> :<text>
//! EMOTE <sender> <channel> :<text>
//! NOTICE <sender> <channel> :<text>
//! JOIN <sender> <channel>
//! LEAVE <sender> <channel>
//! QUIT <sender> :<reason>
//! RENAME <old> <new>
//! CLOSE <channel>
//! ```
//!
//! Gateway to server: `PASS`, `HELLO`, `PONG`, `SAY`, `NOTICE`.

use std::fmt;
use std::str::FromStr;

use crate::error::{LineError, Result};
use crate::foreign::{ForeignAction, ForeignEvent};

/// Maximum accepted line length in bytes.
pub const MAX_LINE_LEN: usize = 4096;

/// A line sent by the foreign server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerLine {
    /// Handshake accepted.
    Welcome,
    /// Handshake rejected.
    Denied(String),
    /// Keepalive probe, answered with `PONG <token>`.
    Ping(String),
    /// A chat event.
    Event(ForeignEvent),
}

/// A line sent by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLine {
    /// Server password.
    Pass(String),
    /// Login under the given name.
    Hello(String),
    /// Keepalive reply.
    Pong(String),
    /// Speak under the gateway's identity.
    Action(ForeignAction),
}

/// Split a line into middle parameters and an optional trailing parameter.
fn split_params(rest: &str) -> (Vec<&str>, Option<&str>) {
    let mut params = Vec::new();
    let mut rest = rest;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return (params, None);
        }
        if let Some(trailing) = rest.strip_prefix(':') {
            return (params, Some(trailing));
        }
        match rest.find(' ') {
            Some(idx) => {
                params.push(&rest[..idx]);
                rest = &rest[idx..];
            }
            None => {
                params.push(rest);
                return (params, None);
            }
        }
    }
}

fn need<'a>(params: &[&'a str], verb: &'static str, needed: usize) -> Result<Vec<&'a str>> {
    if params.len() < needed {
        return Err(LineError::MissingParams { verb, needed });
    }
    Ok(params[..needed].to_vec())
}

impl FromStr for ServerLine {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.contains(['\0', '\r', '\n']) {
            return Err(LineError::IllegalControlChar);
        }
        let line = line.trim_start();
        let (verb, rest) = match line.find(' ') {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, ""),
        };
        if verb.is_empty() {
            return Err(LineError::Empty);
        }

        let (mut params, trailing) = split_params(rest);
        // Treat the trailing parameter as the last positional one.
        if let Some(t) = trailing {
            params.push(t);
        }

        let ev = match verb.to_ascii_uppercase().as_str() {
            "WELCOME" => return Ok(Self::Welcome),
            "DENIED" => return Ok(Self::Denied(params.join(" "))),
            "PING" => {
                let p = need(&params, "PING", 1)?;
                return Ok(Self::Ping(p[0].to_string()));
            }
            "CHAT" => {
                let p = need(&params, "CHAT", 3)?;
                ForeignEvent::Chat {
                    sender: p[0].into(),
                    channel: p[1].into(),
                    text: p[2].into(),
                }
            }
            "EMOTE" => {
                let p = need(&params, "EMOTE", 3)?;
                ForeignEvent::Emote {
                    sender: p[0].into(),
                    channel: p[1].into(),
                    text: p[2].into(),
                }
            }
            "NOTICE" => {
                let p = need(&params, "NOTICE", 3)?;
                ForeignEvent::Notice {
                    sender: p[0].into(),
                    channel: p[1].into(),
                    text: p[2].into(),
                }
            }
            "JOIN" => {
                let p = need(&params, "JOIN", 2)?;
                ForeignEvent::Join {
                    sender: p[0].into(),
                    channel: p[1].into(),
                }
            }
            "LEAVE" => {
                let p = need(&params, "LEAVE", 2)?;
                ForeignEvent::Leave {
                    sender: p[0].into(),
                    channel: p[1].into(),
                }
            }
            "QUIT" => {
                let p = need(&params, "QUIT", 1)?;
                ForeignEvent::Disconnect {
                    sender: p[0].into(),
                    reason: params.get(1).copied().unwrap_or_default().into(),
                }
            }
            "RENAME" => {
                let p = need(&params, "RENAME", 2)?;
                ForeignEvent::Rename {
                    old: p[0].into(),
                    new: p[1].into(),
                }
            }
            "CLOSE" => {
                let p = need(&params, "CLOSE", 1)?;
                ForeignEvent::RoomClosed {
                    channel: p[0].into(),
                }
            }
            other => return Err(LineError::UnknownVerb(other.to_string())),
        };
        Ok(Self::Event(ev))
    }
}

impl fmt::Display for ClientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(secret) => write!(f, "PASS :{secret}"),
            Self::Hello(name) => write!(f, "HELLO {name}"),
            Self::Pong(token) => write!(f, "PONG {token}"),
            Self::Action(ForeignAction::Say { target, text }) => write!(f, "SAY {target} :{text}"),
            Self::Action(ForeignAction::Notice { target, text }) => {
                write!(f, "NOTICE {target} :{text}")
            }
        }
    }
}

impl ClientLine {
    /// Encode, rejecting content that would break line framing.
    pub fn encode(&self) -> Result<String> {
        let out = self.to_string();
        if out.contains(['\0', '\r', '\n']) {
            return Err(LineError::IllegalControlChar);
        }
        Ok(out)
    }
}
