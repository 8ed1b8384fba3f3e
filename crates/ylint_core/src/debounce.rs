//! Per-document debouncing of lint requests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::document::DocumentId;

struct PendingTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Coalesces bursts of requests per document.
///
/// Scheduling a document replaces any timer it already has, so only the last
/// request of a burst runs, once the delay has elapsed without a newer one.
/// Different documents never interfere. Must be used inside a Tokio runtime.
#[derive(Default)]
pub struct DebounceScheduler {
    pending: Arc<Mutex<HashMap<DocumentId, PendingTimer>>>,
    generation: AtomicU64,
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}

impl DebounceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` after `delay` unless the document is scheduled again
    /// or cancelled first.
    pub fn schedule<F, Fut>(&self, document: DocumentId, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);
        let key = document.clone();

        // Held across the spawn so the timer cannot look up its own entry
        // before it has been inserted.
        let mut timers = self.pending.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let current = {
                let mut timers = pending.lock();
                match timers.get(&key) {
                    Some(timer) if timer.generation == generation => {
                        timers.remove(&key);
                        true
                    }
                    _ => false,
                }
            };

            if current {
                trace!("Debounce elapsed for {}", key);
                action().await;
            }
        });

        if let Some(previous) = timers.insert(document, PendingTimer { generation, handle }) {
            previous.handle.abort();
        }
    }

    /// Cancels the document's pending timer. Returns whether one existed.
    pub fn cancel(&self, document: &DocumentId) -> bool {
        match self.pending.lock().remove(document) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&self) {
        for (_, timer) in self.pending.lock().drain() {
            timer.handle.abort();
        }
    }

    pub fn is_pending(&self, document: &DocumentId) -> bool {
        self.pending.lock().contains_key(document)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
