//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use bridge_proto::NickExt;
use thiserror::Error;

use super::{CollisionPolicy, Config};

/// Validation errors for configuration.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("link.ip is required")]
    MissingLinkAddress,
    #[error("link.port must be non-zero")]
    InvalidPort,
    #[error("link.ingamename is not a valid nickname: '{0}'")]
    InvalidIngameName(String),
    #[error("server.hostname is not a valid server name: '{0}'")]
    InvalidHostname(String),
    #[error("replay.hostname is not a valid server name: '{0}'")]
    InvalidReplayHostname(String),
    #[error("translate.collision_suffix must be non-empty unless collision = \"drop\"")]
    EmptyCollisionSuffix,
    #[error("translate.default_host must not contain spaces")]
    InvalidDefaultHost,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.link.ip.trim().is_empty() {
        errors.push(ValidationError::MissingLinkAddress);
    }
    if config.link.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if !config.link.ingamename.is_valid_nick() {
        errors.push(ValidationError::InvalidIngameName(
            config.link.ingamename.clone(),
        ));
    }
    if !config.server.hostname.is_valid_server_name() {
        errors.push(ValidationError::InvalidHostname(
            config.server.hostname.clone(),
        ));
    }
    if !config.replay.hostname.is_valid_server_name() {
        errors.push(ValidationError::InvalidReplayHostname(
            config.replay.hostname.clone(),
        ));
    }
    // Collide falls back to suffixing when the occupant is not foreign.
    if config.translate.collision != CollisionPolicy::Drop
        && config.translate.collision_suffix.is_empty()
    {
        errors.push(ValidationError::EmptyCollisionSuffix);
    }
    if config.translate.default_host.contains(' ') {
        errors.push(ValidationError::InvalidDefaultHost);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
