//! Events received from, and actions sent to, the foreign network.

/// Something that happened on the foreign side.
///
/// Participant names are the foreign display names, unnormalized.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForeignEvent {
    /// A participant spoke in a room.
    Chat {
        /// Foreign display name.
        sender: String,
        /// Room name.
        channel: String,
        /// Message body.
        text: String,
    },
    /// A participant performed an action (`/me`).
    Emote {
        /// Foreign display name.
        sender: String,
        /// Room name.
        channel: String,
        /// Action text.
        text: String,
    },
    /// A participant sent a notice to a room.
    Notice {
        /// Foreign display name.
        sender: String,
        /// Room name.
        channel: String,
        /// Notice body.
        text: String,
    },
    /// A participant entered a room.
    Join {
        /// Foreign display name.
        sender: String,
        /// Room name.
        channel: String,
    },
    /// A participant left a room.
    Leave {
        /// Foreign display name.
        sender: String,
        /// Room name.
        channel: String,
    },
    /// A participant disconnected from the foreign network.
    Disconnect {
        /// Foreign display name.
        sender: String,
        /// Disconnect reason.
        reason: String,
    },
    /// A participant changed display name.
    Rename {
        /// Previous foreign display name.
        old: String,
        /// New foreign display name.
        new: String,
    },
    /// A room was destroyed on the foreign side.
    RoomClosed {
        /// Room name.
        channel: String,
    },
    /// A line that could not be understood.
    Malformed {
        /// The raw input.
        raw: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ForeignEvent {
    /// Short event name for log records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chat { .. } => "chat",
            Self::Emote { .. } => "emote",
            Self::Notice { .. } => "notice",
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Disconnect { .. } => "disconnect",
            Self::Rename { .. } => "rename",
            Self::RoomClosed { .. } => "room_closed",
            Self::Malformed { .. } => "malformed",
        }
    }
}

/// Something the gateway asks the foreign side to do under its own identity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForeignAction {
    /// Speak in a room, or privately to a participant.
    Say {
        /// Room name or foreign display name.
        target: String,
        /// Message body.
        text: String,
    },
    /// Send a notice to a room or participant.
    Notice {
        /// Room name or foreign display name.
        target: String,
        /// Notice body.
        text: String,
    },
}
