//! Task scope: submit tasks bound to their controller's lifetime.
//!
//! Backed by a `JoinSet`, so dropping the scope aborts whatever is still in
//! flight. Finished tasks are reaped on the next spawn. An abort handle is
//! kept per task so `shutdown` also reaches tasks a concurrent `settle` is
//! currently joining.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::{AbortHandle, JoinSet};
use tracing::error;

pub struct TaskScope {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tasks: JoinSet<()>,
    handles: Vec<AbortHandle>,
}

impl TaskScope {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    /// Spawn `task` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.lock();
        while inner.tasks.try_join_next().is_some() {}
        inner.handles.retain(|h| !h.is_finished());
        let handle = inner.tasks.spawn(task);
        inner.handles.push(handle);
    }

    /// Number of tasks not yet reaped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until every spawned task, including ones spawned while waiting,
    /// has finished.
    pub async fn settle(&self) {
        loop {
            let mut running = std::mem::take(&mut self.lock().tasks);
            if running.is_empty() {
                return;
            }
            while let Some(result) = running.join_next().await {
                if let Err(e) = result {
                    if e.is_panic() {
                        error!(error = %e, "submit task panicked");
                    }
                }
            }
        }
    }

    /// Abort every in-flight task, including ones a concurrent `settle` is
    /// waiting on.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        inner.tasks.abort_all();
        for handle in inner.handles.drain(..) {
            handle.abort();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tasks_test.rs"]
mod tests;
