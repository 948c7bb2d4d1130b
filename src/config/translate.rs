//! Event translation policy.

use bridge_proto::Casemapping;
use serde::Deserialize;

use super::defaults::{default_collision_suffix, default_host, default_ident};

/// What to do when a foreign participant's nick is held by a host-side client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `collision_suffix` to the foreign participant's nick.
    #[default]
    Suffix,
    /// Drop the event and log it.
    Drop,
    /// The host-side client loses its nick (a NICKCOLLIDE hook is emitted).
    Collide,
}

/// How inbound foreign events are mapped to mirrored users.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateConfig {
    #[serde(default)]
    pub collision: CollisionPolicy,
    #[serde(default = "default_collision_suffix")]
    pub collision_suffix: String,
    /// Host given to foreign participants.
    #[serde(default = "default_host")]
    pub default_host: String,
    /// Ident given to foreign participants.
    #[serde(default = "default_ident")]
    pub default_ident: String,
    #[serde(default)]
    pub casemapping: Casemapping,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::default(),
            collision_suffix: default_collision_suffix(),
            default_host: default_host(),
            default_ident: default_ident(),
            casemapping: Casemapping::default(),
        }
    }
}
