//! One-shot state notification signals.
//!
//! # Responsibilities
//! - Signal ready / failed / stopped transitions to the owning process
//! - Fire at most once; firing is the only mutation
//! - Support any number of waiters, before or after the fact
//!
//! # Design Decisions
//! - Backed by a `watch` channel so the at-most-once invariant is
//!   structural: the payload is a bool that only ever flips false → true
//! - Waiting after the signal fired returns immediately, every time

use std::sync::Arc;

use tokio::sync::watch;

/// A notification that transitions from unset to set exactly once.
#[derive(Debug, Clone)]
pub struct StateSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StateSignal {
    /// Create an unfired signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Returns `true` if this call fired it, `false` if it
    /// had already fired.
    pub(crate) fn fire(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    /// Whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal fires. Resolves immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives inside self, so wait_for cannot observe a closed
        // channel while this borrow is alive.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for StateSignal {
    fn default() -> Self {
        Self::new()
    }
}
