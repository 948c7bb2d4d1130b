//! Identifier virtualization for entities with no native foreign ID.

use std::sync::atomic::{AtomicU64, Ordering};

pub use bridge_proto::{Sid, Uid};

/// Class of identifier being allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdClass {
    User,
    Server,
}

impl IdClass {
    fn marker(self) -> char {
        match self {
            Self::User => 'U',
            Self::Server => 'S',
        }
    }
}

/// Generates pseudo-identifiers for virtual users and servers.
///
/// Format: `<hint>@<class><6 chars base36>`, e.g. `bob@UAAAAAC`.
///
/// The `@` separator never appears in a valid nickname or server name, so a
/// virtual identifier can never be mistaken for a foreign-native one. The
/// hint is only there for log readability; uniqueness comes from the
/// per-class counter. One generator lives as long as one connection.
#[derive(Debug, Default)]
pub struct IdVirtualizer {
    users: AtomicU64,
    servers: AtomicU64,
}

/// Longest hint kept in an identifier.
const MAX_HINT_LEN: usize = 16;

impl IdVirtualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier of `class`.
    pub fn allocate(&self, class: IdClass, hint: &str) -> String {
        let counter = match class {
            IdClass::User => &self.users,
            IdClass::Server => &self.servers,
        };
        let n = counter.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}@{}{}",
            sanitize_hint(hint),
            class.marker(),
            base36_encode_6(n)
        )
    }

    /// Whether `id` has the shape of a virtual identifier.
    pub fn is_virtual_id(id: &str) -> bool {
        id.rsplit_once('@').is_some_and(|(_, tail)| {
            tail.len() == 7
                && matches!(tail.as_bytes()[0], b'U' | b'S')
                && tail[1..]
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        })
    }
}

fn sanitize_hint(hint: &str) -> String {
    hint.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '|'))
        .take(MAX_HINT_LEN)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Encode a number as a 6-character base36 string.
fn base36_encode_6(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut result = [b'A'; 6];

    for i in (0..6).rev() {
        result[i] = CHARS[(n % 36) as usize];
        n /= 36;
    }

    String::from_utf8_lossy(&result).into_owned()
}
