//! Event translation between the foreign protocol and the canonical model.
//!
//! Inbound foreign events become canonical hooks ([`Translator::translate_inbound`]).
//! Outbound canonical commands become a foreign action, relay hooks, or a
//! documented no-op ([`Translator::translate_outbound`]). Both directions keep
//! the [`EntityMirror`] in step.

mod caps;
mod inbound;
pub mod normalize;
mod outbound;

pub use caps::{Capability, PROTOCOL_CAPS, capability};

use std::sync::Arc;

use bridge_proto::{ForeignAction, HookEvent};

use crate::config::TranslateConfig;
use crate::state::{EntityMirror, FieldChange, Sid, Uid};

/// What an outbound command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A foreign action was sent under the primary identity.
    Sent,
    /// Re-expressed as relay hooks for the host.
    Relayed,
    /// A client was spawned.
    Spawned(Uid),
    /// A server was spawned.
    ServerSpawned(Sid),
    /// A client field update.
    Updated(FieldChange),
    /// Accepted and ignored.
    NoOp(&'static str),
}

/// Result of translating one outbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub outcome: Outcome,
    /// Action for the transport, if any.
    pub action: Option<ForeignAction>,
    /// Hooks to emit once the action (if any) has been sent.
    pub hooks: Vec<HookEvent>,
}

impl Outbound {
    fn no_op(reason: &'static str) -> Self {
        Self {
            outcome: Outcome::NoOp(reason),
            action: None,
            hooks: Vec::new(),
        }
    }

    fn relayed(hooks: Vec<HookEvent>) -> Self {
        Self {
            outcome: Outcome::Relayed,
            action: None,
            hooks,
        }
    }

    fn with(outcome: Outcome, hooks: Vec<HookEvent>) -> Self {
        Self {
            outcome,
            action: None,
            hooks,
        }
    }
}

/// Translator for one connection.
///
/// Inbound translation must be driven by a single task so events are applied
/// in arrival order.
#[derive(Debug)]
pub struct Translator {
    mirror: Arc<EntityMirror>,
    config: TranslateConfig,
    /// Root server of this connection; foreign participants live under it.
    root: Sid,
    /// The gateway's own identity on the foreign side.
    primary: Uid,
}

impl Translator {
    pub fn new(
        mirror: Arc<EntityMirror>,
        config: TranslateConfig,
        root: Sid,
        primary: Uid,
    ) -> Self {
        Self {
            mirror,
            config,
            root,
            primary,
        }
    }

    pub fn mirror(&self) -> &Arc<EntityMirror> {
        &self.mirror
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }
}
