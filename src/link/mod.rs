//! Connection supervision.
//!
//! The [`Gateway`] drives the lifecycle `Disconnected → Connecting →
//! Connected → Disconnected`, owns the abort latch, and runs the teardown
//! cascade when the link goes away.

mod latch;
mod split;
mod state;
mod supervisor;

pub use latch::AbortLatch;
pub use split::TeardownCause;
pub use state::LinkState;
pub use supervisor::Gateway;
