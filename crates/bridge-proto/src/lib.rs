//! # bridge-proto
//!
//! The canonical model spoken between an IRC services host and a
//! protocol-bridging gateway, plus the newline-delimited wire format of the
//! foreign chat link.
//!
//! ## Contents
//!
//! - [`HookEvent`]: canonical events the gateway emits to the host hook bus
//! - [`Command`]: canonical commands the host invokes on the gateway
//! - [`ForeignEvent`] / [`ForeignAction`]: what arrives from, and is sent to,
//!   the foreign network
//! - [`line`]: parsing and encoding of the foreign line protocol
//! - [`casemap`] and [`nick`]: name folding and validation
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_proto::{ServerLine, ForeignEvent};
//!
//! let line: ServerLine = "CHAT Bob #town :hello there".parse().unwrap();
//! match line {
//!     ServerLine::Event(ForeignEvent::Chat { sender, channel, text }) => {
//!         assert_eq!(sender, "Bob");
//!         assert_eq!(channel, "#town");
//!         assert_eq!(text, "hello there");
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod command;
pub mod error;
pub mod foreign;
pub mod hook;
pub mod line;
pub mod nick;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower, Casemapping};
pub use self::chan::ChannelExt;
pub use self::command::{Command, Field, SpawnClient, SpawnServer};
pub use self::error::LineError;
pub use self::foreign::{ForeignAction, ForeignEvent};
pub use self::hook::{HookEvent, HookKind, UserInfo};
pub use self::line::{ClientLine, ServerLine};
pub use self::nick::{NickExt, DEFAULT_NICK_MAX_LEN};

/// Opaque identifier of a user inside the gateway.
pub type Uid = String;

/// Opaque identifier of a server inside the gateway.
pub type Sid = String;
