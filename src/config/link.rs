//! Foreign link configuration.

use std::time::Duration;

use serde::Deserialize;

use super::defaults::{
    default_connect_timeout, default_drain_timeout_ms, default_ingamename, default_port,
};

/// Where and how to reach the foreign network.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    /// Remote IP/hostname to connect to.
    pub ip: String,
    /// Remote port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Server password, for servers that require one.
    #[serde(default)]
    pub sendpass: Option<String>,
    /// Name the gateway logs in with on the foreign side.
    #[serde(default = "default_ingamename")]
    pub ingamename: String,
    /// Seconds allowed for connect plus handshake.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Milliseconds a stop waits for queued inbound events to drain.
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

impl LinkConfig {
    /// Link to `ip` with every other field defaulted.
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port: default_port(),
            sendpass: None,
            ingamename: default_ingamename(),
            connect_timeout_secs: default_connect_timeout(),
            drain_timeout_ms: default_drain_timeout_ms(),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}
