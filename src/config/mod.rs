//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, LoggingConfig, ReplayConfig)
//! - [`link`]: Foreign link configuration (LinkConfig)
//! - [`translate`]: Event translation policy (TranslateConfig, CollisionPolicy)
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup validation

mod defaults;
mod link;
mod translate;
mod types;
pub mod validation;

pub use link::LinkConfig;
pub use translate::{CollisionPolicy, TranslateConfig};
pub use types::{Config, ConfigError, LogFormat, LoggingConfig, ReplayConfig, ServerConfig};
