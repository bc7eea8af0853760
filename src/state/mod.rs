//! §3 Data Model / §4.4 State Replica — the locally maintained mirror of
//! the browser's page tree, mutated exclusively by the Dispatcher's
//! event-handling path under the Target → Frame → Node nested lock
//! order (§5 Locking discipline).

mod frame;
mod node;
mod target;

pub use frame::{Frame, LifecycleFlags};
pub use node::Node;
pub use target::Target;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// A one-shot-or-rearmable signal: `Visible` waits on a boxed model, a
/// navigation rearms "loaded" before firing, a removed Node closes its
/// invalidation signal exactly once. Plain `tokio::sync::Notify` has no
/// way to ask "already fired?" without racing a waiter, so this pairs it
/// with a flag.
#[derive(Debug, Clone)]
pub struct Signal {
    fired: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            fired: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Closes the signal. Idempotent; only the first call has any
    /// effect, matching "closed exactly once" (§8 invariant).
    pub fn close(&self) {
        if !self.fired.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Resets the signal so it can be closed (and waited on) again.
    pub fn rearm(&self) {
        self.fired.store(false, Ordering::SeqCst);
    }

    /// Waits until closed. Safe even if `close` raced ahead of this call.
    pub async fn wait(&self) {
        loop {
            if self.is_closed() {
                return;
            }
            let notified = self.notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}
