//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "relay".to_string()
}

pub fn default_hostname() -> String {
    "relay.int".to_string()
}

// =============================================================================
// Link Defaults
// =============================================================================

pub fn default_port() -> u16 {
    7777
}

pub fn default_ingamename() -> String {
    "PyLink".to_string()
}

pub fn default_connect_timeout() -> u64 {
    10
}

pub fn default_drain_timeout_ms() -> u64 {
    2000
}

// =============================================================================
// Translation Defaults
// =============================================================================

pub fn default_collision_suffix() -> String {
    "|relay".to_string()
}

pub fn default_host() -> String {
    "unknown.host".to_string()
}

pub fn default_ident() -> String {
    "unknown".to_string()
}

// =============================================================================
// Replay Defaults
// =============================================================================

pub fn default_replay_hostname() -> String {
    "mimic.int".to_string()
}

pub fn default_replay_suffix() -> String {
    "|mimic".to_string()
}

pub fn default_line_delay_ms() -> u64 {
    150
}
