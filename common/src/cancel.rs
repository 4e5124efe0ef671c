use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Cooperative stop signal owned by a single scan session.
///
/// Cloned into every task the session spawns. Tasks either poll
/// [`CancelToken::is_cancelled`] between units of work or await
/// [`CancelToken::cancelled`] inside a `select!` arm.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    stopped: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.stopped.store(true, Ordering::Relaxed);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.stopped.load(Ordering::Relaxed)
    }

    /// Resolves once [`CancelToken::cancel`] has been called.
    ///
    /// The notified future is registered before the flag check, so a cancel
    /// racing this call cannot be missed.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
