//! One-shot abort signal raised when the transport drops.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Shared abort latch.
///
/// Set by the transport (connection lost) or by `stop()`. Cleared when a new
/// connection reaches `Connected`. Waiters are woken without polling.
#[derive(Debug, Clone, Default)]
pub struct AbortLatch {
    inner: Arc<LatchInner>,
}

#[derive(Debug, Default)]
struct LatchInner {
    set: AtomicBool,
    notify: Notify,
}

impl AbortLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the latch and wake every waiter.
    pub fn set(&self) {
        self.inner.set.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn clear(&self) {
        self.inner.set.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.inner.set.load(Ordering::SeqCst)
    }

    /// Wait until the latch is set. Returns immediately if it already is.
    pub async fn wait(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before checking so a concurrent `set` is not missed.
        notified.as_mut().enable();
        if self.is_set() {
            return;
        }
        notified.await;
    }
}
