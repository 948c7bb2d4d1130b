//! Error types for the foreign line protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`LineError`].
pub type Result<T, E = LineError> = std::result::Result<T, E>;

/// Why a foreign protocol line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LineError {
    /// The line had no verb.
    #[error("empty line")]
    Empty,

    /// The verb is not part of the protocol.
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// Too few parameters for the verb.
    #[error("{verb} needs {needed} parameter(s)")]
    MissingParams {
        /// The verb being parsed.
        verb: &'static str,
        /// How many it needs.
        needed: usize,
    },

    /// The line contains NUL, CR or LF.
    #[error("illegal control character in line")]
    IllegalControlChar,
}

impl LineError {
    /// Static label for log records.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::UnknownVerb(_) => "unknown_verb",
            Self::MissingParams { .. } => "missing_params",
            Self::IllegalControlChar => "illegal_control_char",
        }
    }
}
