//! Chat log replay.
//!
//! Replays ZNC/energymech-format chat logs into a channel by spawning a
//! throwaway user per logged nick on an internal server and relaying each
//! logged line as that user. The server is squit once the logs are done, so
//! every replayed user is cleaned up with it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bridge_proto::{ChannelExt, Command, SpawnClient, SpawnServer};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ReplayConfig;
use crate::error::GatewayError;
use crate::link::Gateway;
use crate::state::{Sid, Uid};
use crate::translate::Outcome;
use crate::translate::normalize::{clean, is_usable_nick, normalize_nick, with_suffix};

const CHAT_PATTERN: &str = r"^\[(?:[0-9]{2}:){2}[0-9]{2}\] <(.+?)> (.*)$";
const ACTION_PATTERN: &str = r"^\[(?:[0-9]{2}:){2}[0-9]{2}\] \* (\S+?) (.*)$";

/// Ident given to replayed users.
const REPLAY_IDENT: &str = "mimic";

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("invalid channel: {0}")]
    InvalidChannel(String),

    #[error("invalid log pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log parser: {0}")]
    Regex(#[from] regex::Error),

    #[error("gateway refused replay: {0}")]
    Gateway(#[from] GatewayError),

    #[error("gateway returned {0:?} while spawning the replay server")]
    UnexpectedOutcome(Outcome),
}

impl ReplayError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidChannel(_) => "invalid_channel",
            Self::Pattern(_) => "pattern",
            Self::Io { .. } => "io",
            Self::Regex(_) => "regex",
            Self::Gateway(e) => e.error_code(),
            Self::UnexpectedOutcome(_) => "unexpected_outcome",
        }
    }
}

/// One spoken line from a chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub nick: String,
    pub text: String,
    /// `* nick does something`.
    pub action: bool,
}

/// Recognizes chat and action lines.
#[derive(Debug, Clone)]
pub struct LogParser {
    chat: Regex,
    action: Regex,
}

impl LogParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            chat: Regex::new(CHAT_PATTERN)?,
            action: Regex::new(ACTION_PATTERN)?,
        })
    }

    /// Parse one log line. Joins, parts and other noise yield `None`.
    pub fn parse(&self, line: &str) -> Option<LogLine> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (caps, action) = match self.action.captures(line) {
            Some(caps) => (caps, true),
            None => (self.chat.captures(line)?, false),
        };
        Some(LogLine {
            nick: caps.get(1)?.as_str().to_string(),
            text: caps.get(2)?.as_str().to_string(),
            action,
        })
    }
}

/// What a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub files: usize,
    pub lines: usize,
    pub users: usize,
}

/// Expand a log glob (`~` and `$VARS` are not expanded) into sorted paths.
pub fn expand_logs(pattern: &str) -> Result<Vec<PathBuf>, ReplayError> {
    let mut paths: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable log path");
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Replay `logs` into `channel` through a connected gateway.
pub async fn replay(
    gateway: &Gateway,
    channel: &str,
    logs: &[PathBuf],
    config: &ReplayConfig,
) -> Result<ReplaySummary, ReplayError> {
    if !channel.is_channel_name() {
        return Err(ReplayError::InvalidChannel(channel.to_string()));
    }
    let parser = LogParser::new()?;
    let primary = gateway.primary().ok_or(GatewayError::NotConnected)?;
    let root = gateway.root().ok_or(GatewayError::NotConnected)?;

    let sid = match gateway
        .command(Command::SpawnServer(SpawnServer {
            name: config.hostname.clone(),
            uplink: None,
            description: Some("Chat log replay".to_string()),
            internal: true,
        }))
        .await?
    {
        Outcome::ServerSpawned(sid) => sid,
        other => return Err(ReplayError::UnexpectedOutcome(other)),
    };

    let mut session = ReplaySession {
        gateway,
        config,
        channel,
        sid: sid.clone(),
        users: HashMap::new(),
    };
    let mut summary = ReplaySummary::default();

    let result = async {
        for path in logs {
            let banner = format!("Beginning replay of log file {}", path.display());
            announce(gateway, &primary, channel, banner).await?;
            summary.lines += session.play_file(&parser, path).await?;
            summary.files += 1;
        }
        Ok::<_, ReplayError>(())
    }
    .await;
    summary.users = session.users.len();

    // The server goes away even if the replay failed halfway.
    if let Err(e) = gateway
        .command(Command::Squit {
            source: root,
            target: sid,
            reason: "Replay finished".to_string(),
        })
        .await
    {
        warn!(error = %e, "Could not remove replay server");
    }
    result?;

    let banner = format!("Finished replay of {} items", summary.files);
    announce(gateway, &primary, channel, banner).await?;
    info!(
        channel = %channel,
        files = summary.files,
        lines = summary.lines,
        users = summary.users,
        "Replay complete"
    );
    Ok(summary)
}

async fn announce(
    gateway: &Gateway,
    primary: &str,
    channel: &str,
    text: String,
) -> Result<(), GatewayError> {
    gateway
        .command(Command::Message {
            source: primary.to_string(),
            target: channel.to_string(),
            text,
            notice: true,
        })
        .await
        .map(|_| ())
}

struct ReplaySession<'a> {
    gateway: &'a Gateway,
    config: &'a ReplayConfig,
    channel: &'a str,
    sid: Sid,
    /// Logged nick (lower-cased) to spawned user.
    users: HashMap<String, Uid>,
}

impl ReplaySession<'_> {
    async fn play_file(&mut self, parser: &LogParser, path: &Path) -> Result<usize, ReplayError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let delay = Duration::from_millis(self.config.line_delay_ms);

        let mut spoken = 0;
        for line in content.lines() {
            let Some(logged) = parser.parse(line) else {
                continue;
            };
            if self.say(logged).await? {
                spoken += 1;
            }
            tokio::time::sleep(delay).await;
        }
        debug!(path = %path.display(), lines = spoken, "Log file replayed");
        Ok(spoken)
    }

    async fn say(&mut self, logged: LogLine) -> Result<bool, ReplayError> {
        let Some(uid) = self.user_for(&logged.nick).await? else {
            return Ok(false);
        };
        let text = if logged.action {
            format!("\x01ACTION {}\x01", logged.text)
        } else {
            logged.text
        };
        self.gateway
            .command(Command::Message {
                source: uid,
                target: self.channel.to_string(),
                text,
                notice: false,
            })
            .await?;
        Ok(true)
    }

    async fn user_for(&mut self, logged_nick: &str) -> Result<Option<Uid>, ReplayError> {
        let key = clean(logged_nick).to_ascii_lowercase();
        if let Some(uid) = self.users.get(&key) {
            return Ok(Some(uid.clone()));
        }

        let mut nick = normalize_nick(logged_nick);
        let taken = self
            .gateway
            .mirror()
            .is_some_and(|m| m.nick_to_uid(&nick).is_some());
        if taken {
            nick = with_suffix(&nick, &self.config.suffix);
        }
        if !is_usable_nick(&nick) {
            warn!(nick = %logged_nick, "Bad nick in log, ignoring its lines");
            return Ok(None);
        }

        let mut req = SpawnClient::new(nick);
        req.ident = Some(REPLAY_IDENT.to_string());
        req.host = Some(self.config.hostname.clone());
        req.server = Some(self.sid.clone());
        let uid = match self.gateway.command(Command::SpawnClient(req)).await {
            Ok(Outcome::Spawned(uid)) => uid,
            Ok(other) => return Err(ReplayError::UnexpectedOutcome(other)),
            Err(GatewayError::Mirror(e)) => {
                warn!(nick = %logged_nick, error = %e, "Cannot spawn replay user");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        self.gateway
            .command(Command::Join {
                client: uid.clone(),
                channel: self.channel.to_string(),
            })
            .await?;
        debug!(uid = %uid, nick = %logged_nick, "Spawned replay user");
        self.users.insert(key, uid.clone());
        Ok(Some(uid))
    }
}
