//! Immutable-snapshot container with subscribe/notify.
//!
//! One writer (the owning controller and its tasks), any number of readers.
//! Every update replaces the whole snapshot under the channel lock, so a
//! reader never sees a half-applied change.

use tokio::sync::watch;

pub struct StateStore<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> StateStore<S> {
    #[must_use]
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Receiver that yields the current snapshot and wakes on every update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Derive the next snapshot from the current one (read-modify-write).
    pub fn update(&self, next: impl FnOnce(&S) -> S) {
        self.tx.send_modify(|current| *current = next(current));
    }

    /// Replace the snapshot outright.
    pub fn replace(&self, next: S) {
        self.tx.send_replace(next);
    }
}

impl<S: Clone + Default> Default for StateStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
