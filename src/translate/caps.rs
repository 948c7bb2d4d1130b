//! Command capability table.
//!
//! Every canonical command is classified here, once. Commands the foreign
//! protocol cannot express carry the reason reported back to the caller.

use bridge_proto::Command;

/// Protocol capabilities advertised to the host.
pub const PROTOCOL_CAPS: &[&str] = &[
    "clear-channels-on-leave",
    "slash-in-nicks",
    "slash-in-hosts",
    "underscore-in-hosts",
];

/// How the gateway handles a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Translated to a foreign action, a relay hook or a state change.
    Supported,
    /// Accepted and ignored, with a reason.
    Unsupported(&'static str),
}

/// Look up how `cmd` is handled.
pub fn capability(cmd: &Command) -> Capability {
    use Capability::{Supported, Unsupported};

    match cmd {
        Command::SpawnClient(_)
        | Command::SpawnServer(_)
        | Command::Message { .. }
        | Command::Join { .. }
        | Command::Sjoin { .. }
        | Command::Part { .. }
        | Command::Quit { .. }
        | Command::Squit { .. }
        | Command::UpdateClient { .. } => Supported,
        Command::Kick { .. } => Unsupported("foreign rooms have no kick"),
        Command::Topic { .. } | Command::TopicBurst { .. } => {
            Unsupported("foreign rooms have no topic")
        }
        Command::Kill { .. } => Unsupported("foreign participants cannot be disconnected"),
        Command::Away { .. } => Unsupported("foreign protocol has no away status"),
        Command::Invite { .. } | Command::Knock { .. } => Unsupported("foreign rooms are open"),
        Command::Numeric { .. } => Unsupported("foreign protocol has no numerics"),
        Command::Mode { .. } => Unsupported("foreign protocol has no modes"),
    }
}
