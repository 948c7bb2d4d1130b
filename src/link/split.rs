//! Link teardown cascade.
//!
//! When the link goes away, everything mirrored under the root server goes
//! with it:
//! - the root server and every server behind it are removed
//! - every removed user except the gateway's own identity gets a QUIT hook
//! - a single SQUIT hook lists everyone who was removed
//! - the mirror is emptied

use bridge_proto::{HookEvent, HookKind};
use tracing::{debug, info, warn};

use crate::hooks::HookSink;
use crate::state::SplitSnapshot;
use crate::translate::Translator;

/// Why the link went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownCause {
    /// `stop()` was called.
    Stop,
    /// The transport dropped.
    Aborted,
}

impl TeardownCause {
    pub fn reason(self) -> &'static str {
        match self {
            Self::Stop => "Gateway stopped",
            Self::Aborted => "Connection lost",
        }
    }
}

/// Remove everything the connection mirrored and announce it.
pub fn cascade(
    translator: &Translator,
    sink: &dyn HookSink,
    cause: TeardownCause,
) -> SplitSnapshot {
    let mirror = translator.mirror();
    let root = translator.root();
    let reason = cause.reason();

    let split = match mirror.remove_server(root) {
        Ok(split) => split,
        Err(e) => {
            warn!(root = %root, error = %e, "Root server missing at teardown");
            SplitSnapshot::default()
        }
    };

    for user in &split.users {
        if user.uid == translator.primary() {
            continue;
        }
        debug!(uid = %user.uid, nick = %user.nick, "Cascade quit");
        sink.emit(HookEvent::new(
            user.uid.clone(),
            HookKind::Quit {
                reason: reason.to_string(),
                user: user.info(),
            },
        ));
    }

    sink.emit(HookEvent::new(
        root.to_string(),
        HookKind::ServerQuit {
            target: root.to_string(),
            reason: reason.to_string(),
            users: split.removed_users(),
        },
    ));

    mirror.clear();
    info!(
        cause = ?cause,
        servers = split.servers.len(),
        users = split.users.len(),
        "Link teardown complete"
    );
    split
}
