//! Foreign name normalization.
//!
//! Foreign display names are free-form. These helpers turn them into IRC
//! nicknames and channel names, or reject them.

use bridge_proto::{ChannelExt, DEFAULT_NICK_MAX_LEN, NickExt};

/// Formatting bytes that leak into foreign names (CTCP, bold, colour).
const STRIP_CHARS: &[char] = &['\x01', '\x02', '\x03'];

/// Strip formatting bytes and surrounding whitespace.
pub fn clean(raw: &str) -> &str {
    raw.trim().trim_matches(STRIP_CHARS).trim()
}

/// Key under which a foreign participant is remembered.
///
/// Foreign names compare case-insensitively, independent of the host's
/// case mapping.
pub fn foreign_key(raw: &str) -> String {
    clean(raw).to_ascii_lowercase()
}

/// Map a foreign display name to a candidate nickname.
///
/// The result is not guaranteed to be valid; callers check with
/// [`NickExt::is_valid_nick`].
pub fn normalize_nick(raw: &str) -> String {
    let cleaned: String = clean(raw)
        .chars()
        .filter(|c| !STRIP_CHARS.contains(c))
        .map(|c| match c {
            '/' => '|',
            ' ' => '_',
            c => c,
        })
        .collect();

    let mut nick = match cleaned.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '-' => format!("_{cleaned}"),
        _ => cleaned,
    };
    truncate_chars(&mut nick, DEFAULT_NICK_MAX_LEN);
    nick
}

/// `nick` with `suffix` appended, shortening `nick` so the result fits.
pub fn with_suffix(nick: &str, suffix: &str) -> String {
    let room = DEFAULT_NICK_MAX_LEN.saturating_sub(suffix.chars().count());
    let mut base = nick.to_string();
    truncate_chars(&mut base, room);
    base.push_str(suffix);
    base
}

/// Map a foreign room name to a channel name, adding `#` when missing.
pub fn normalize_channel(raw: &str) -> Option<String> {
    let cleaned = clean(raw);
    let name = if cleaned.starts_with(['#', '&']) {
        cleaned.to_string()
    } else {
        format!("#{cleaned}")
    };
    name.is_channel_name().then_some(name)
}

/// Whether a normalized nick may be used.
pub fn is_usable_nick(nick: &str) -> bool {
    nick.is_valid_nick()
}

fn truncate_chars(s: &mut String, max: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
}
