//! Unified error handling for slirc-bridge.
//!
//! Errors are grouped by where they surface: mirror (referential) errors,
//! transport errors, connection errors and the gateway's command errors.
//! Unsupported commands are not errors at all; they resolve to
//! [`crate::translate::Outcome::NoOp`].

use thiserror::Error;

use crate::link::LinkState;

// ============================================================================
// Mirror Errors (referential integrity)
// ============================================================================

/// The mirror and the caller disagree about what exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unknown server: {0}")]
    UnknownServer(String),

    #[error("server already exists: {0}")]
    DuplicateServer(String),

    #[error("foreign participant already mirrored: {0}")]
    DuplicateUser(String),

    #[error("nickname in use: {0}")]
    NickInUse(String),
}

impl MirrorError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUser(_) => "unknown_user",
            Self::UnknownServer(_) => "unknown_server",
            Self::DuplicateServer(_) => "duplicate_server",
            Self::DuplicateUser(_) => "duplicate_user",
            Self::NickInUse(_) => "nickname_in_use",
        }
    }
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Failures of the underlying foreign transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("handshake rejected: {0}")]
    Rejected(String),

    #[error("connection closed during handshake")]
    ClosedDuringHandshake,

    #[error("transport not started")]
    NotStarted,

    #[error("line cannot be encoded: {0}")]
    Encode(#[from] bridge_proto::LineError),
}

impl TransportError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Rejected(_) => "rejected",
            Self::ClosedDuringHandshake => "closed_during_handshake",
            Self::NotStarted => "not_started",
            Self::Encode(_) => "encode",
        }
    }
}

// ============================================================================
// Connection Errors (reported from Connecting)
// ============================================================================

/// Why `connect()` failed. The gateway never retries on its own.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("cannot connect while {}", .0.as_str())]
    InvalidState(LinkState),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("connection timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("could not register local entities: {0}")]
    Mirror(#[from] MirrorError),
}

impl ConnectError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidState(_) => "invalid_state",
            Self::Transport(e) => e.error_code(),
            Self::Timeout(_) => "timeout",
            Self::Mirror(e) => e.error_code(),
        }
    }
}

// ============================================================================
// Gateway Errors (outbound commands)
// ============================================================================

/// Errors from [`crate::link::Gateway::command`].
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("not connected")]
    NotConnected,

    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid channel name: {0}")]
    InvalidChannel(String),

    #[error("invalid nickname: {0}")]
    InvalidNick(String),
}

impl GatewayError {
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::Mirror(e) => e.error_code(),
            Self::Transport(e) => e.error_code(),
            Self::InvalidChannel(_) => "invalid_channel",
            Self::InvalidNick(_) => "invalid_nick",
        }
    }
}

/// Result type for outbound commands.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MirrorError::UnknownUser("x".into()).error_code(), "unknown_user");
        assert_eq!(
            GatewayError::from(MirrorError::UnknownServer("s".into())).error_code(),
            "unknown_server"
        );
        assert_eq!(
            ConnectError::from(TransportError::Rejected("bad pass".into())).error_code(),
            "rejected"
        );
        assert_eq!(GatewayError::NotConnected.error_code(), "not_connected");
    }

    #[test]
    fn mirror_errors_display_transparently() {
        let err = GatewayError::from(MirrorError::UnknownUser("bob@UAAAAAA".into()));
        assert_eq!(err.to_string(), "unknown user: bob@UAAAAAA");
    }
}
