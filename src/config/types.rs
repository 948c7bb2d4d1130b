//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_hostname, default_line_delay_ms, default_replay_hostname, default_replay_suffix,
    default_server_name,
};
use super::link::LinkConfig;
use super::translate::TranslateConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Local identity of the bridged network.
    #[serde(default)]
    pub server: ServerConfig,
    /// The foreign link.
    pub link: LinkConfig,
    /// Inbound translation policy.
    #[serde(default)]
    pub translate: TranslateConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Chat log replay.
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Minimal configuration for a link to `ip`.
    pub fn for_link(ip: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            link: LinkConfig::new(ip),
            translate: TranslateConfig::default(),
            logging: LoggingConfig::default(),
            replay: ReplayConfig::default(),
        }
    }
}

/// Identity of the bridged network inside the host.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Network name (used in log spans).
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Name of the root virtual server.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Root server description.
    #[serde(default)]
    pub description: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            hostname: default_hostname(),
            description: String::new(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration. `RUST_LOG` overrides `level`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_level(),
        }
    }
}

/// Chat log replay settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    /// Name of the internal server replayed users are spawned on.
    #[serde(default = "default_replay_hostname")]
    pub hostname: String,
    /// Suffix for replayed nicks already taken by someone else.
    #[serde(default = "default_replay_suffix")]
    pub suffix: String,
    /// Pause between replayed lines.
    #[serde(default = "default_line_delay_ms")]
    pub line_delay_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            hostname: default_replay_hostname(),
            suffix: default_replay_suffix(),
            line_delay_ms: default_line_delay_ms(),
        }
    }
}
