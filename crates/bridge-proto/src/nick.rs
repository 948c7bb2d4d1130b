//! Nickname and server name validation.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format (nickname definition)

/// Extension trait for checking if a string is a valid IRC nickname.
pub trait NickExt {
    /// Check if this string is a valid IRC nickname per RFC 2812.
    ///
    /// ```
    /// use bridge_proto::NickExt;
    ///
    /// assert!("Bob".is_valid_nick());
    /// assert!("Bob|relay".is_valid_nick());
    /// assert!(!"123bob".is_valid_nick());
    /// assert!(!"bob@U00000".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Check if this string is a valid IRC nickname with a custom max length.
    fn is_valid_nick_len(&self, max_len: usize) -> bool;

    /// Check if this string can name a server (`a.b`, no spaces, no `@`).
    fn is_valid_server_name(&self) -> bool;
}

/// Default maximum nickname length per RFC 2812.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

/// Per RFC 2812: `[ ] \ ` ^ _ { | }`
#[inline]
pub(crate) fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

impl NickExt for &str {
    fn is_valid_nick(&self) -> bool {
        self.is_valid_nick_len(DEFAULT_NICK_MAX_LEN)
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        if self.is_empty() || self.len() > max_len {
            return false;
        }

        let mut chars = self.chars();

        let first = match chars.next() {
            Some(c) => c,
            None => return false,
        };

        if !first.is_ascii_alphabetic() && !is_special(first) {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }

    fn is_valid_server_name(&self) -> bool {
        !self.is_empty()
            && self.len() <= 63
            && self.contains('.')
            && !self.starts_with('.')
            && self
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    }
}

impl NickExt for String {
    fn is_valid_nick(&self) -> bool {
        self.as_str().is_valid_nick()
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        self.as_str().is_valid_nick_len(max_len)
    }

    fn is_valid_server_name(&self) -> bool {
        self.as_str().is_valid_server_name()
    }
}
