//! Delayed actions that can be taken back within a window.
//!
//! Destructive operations (deleting a collection, removing a saved
//! article) are scheduled here instead of being run right away. The action
//! runs when the window elapses unless [`UndoScheduler::undo`] is called
//! first. Only one action is pending at a time.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Default time before a scheduled action runs.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUndo {
    pub id: u64,
    pub label: String,
    pub started_at: Instant,
    pub window: Duration,
}

impl PendingUndo {
    /// Percentage of the window that has elapsed, 0 to 100.
    pub fn progress(&self) -> u8 {
        if self.window.is_zero() {
            return 100;
        }
        let window = self.window.as_millis();
        let elapsed = self.started_at.elapsed().as_millis();
        (elapsed.min(window) * 100 / window) as u8
    }

    pub fn remaining(&self) -> Duration {
        self.window.saturating_sub(self.started_at.elapsed())
    }
}

/// Handle to the task waiting out a window. Dropping `commit` cancels it.
struct Slot {
    id: u64,
    commit: oneshot::Sender<()>,
    /// Set by `undo` under the slot lock.
    undone: Arc<AtomicBool>,
}

enum Fired {
    Elapsed,
    Forced,
    Cancelled,
}

struct Inner {
    window: Duration,
    slot: Mutex<Option<Slot>>,
    pending: watch::Sender<Option<PendingUndo>>,
    next_id: AtomicU64,
}

impl Inner {
    /// Called by the task `id` once its window elapsed. Vacates the slot if
    /// it still holds `id` and tells whether the action should run.
    ///
    /// A slot holding a newer id means `id` was replaced and committed early,
    /// not undone, so only `undone` decides.
    fn claim_elapsed(&self, id: u64, undone: &AtomicBool) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if undone.load(Ordering::SeqCst) {
            return false;
        }
        if slot.as_ref().is_some_and(|s| s.id == id) {
            *slot = None;
        }
        true
    }
}

#[derive(Clone)]
pub struct UndoScheduler {
    inner: Arc<Inner>,
}

impl Default for UndoScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW)
    }
}

impl UndoScheduler {
    pub fn new(window: Duration) -> Self {
        let (pending, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                window,
                slot: Mutex::new(None),
                pending,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Run `action` once the window elapses.
    ///
    /// An action that is still pending is committed right away. Failures
    /// of the action are logged. Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, label: impl Into<String>, action: F) -> u64
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let id = inner.next_id.fetch_add(1, Ordering::Relaxed);
        let label = label.into();
        let (commit, forced) = oneshot::channel();
        let undone = Arc::new(AtomicBool::new(false));

        let previous = {
            let mut slot = inner.slot.lock().unwrap_or_else(PoisonError::into_inner);
            slot.replace(Slot {
                id,
                commit,
                undone: Arc::clone(&undone),
            })
        };
        if let Some(previous) = previous {
            debug!(id = previous.id, "Committing pending action early");
            let _ = previous.commit.send(());
        }

        inner.pending.send_replace(Some(PendingUndo {
            id,
            label: label.clone(),
            started_at: Instant::now(),
            window: inner.window,
        }));
        debug!(id, label = %label, "Scheduled undoable action");

        tokio::spawn(async move {
            let fired = tokio::select! {
                _ = tokio::time::sleep(inner.window) => Fired::Elapsed,
                res = forced => if res.is_ok() { Fired::Forced } else { Fired::Cancelled },
            };

            match fired {
                Fired::Cancelled => return,
                Fired::Forced => {}
                Fired::Elapsed => {
                    if !inner.claim_elapsed(id, &undone) {
                        debug!(id, "Action undone before it ran");
                        return;
                    }
                }
            }

            match action().await {
                Ok(()) => info!(label = %label, "Action committed"),
                Err(e) => warn!(label = %label, error = %e, "Action failed"),
            }

            inner.pending.send_if_modified(|pending| {
                if pending.as_ref().is_some_and(|p| p.id == id) {
                    *pending = None;
                    true
                } else {
                    false
                }
            });
        });

        id
    }

    /// Cancel the pending action. Returns false if there was nothing left
    /// to cancel.
    pub fn undo(&self) -> bool {
        let taken = {
            let mut slot = self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner);
            let taken = slot.take();
            if let Some(taken) = &taken {
                taken.undone.store(true, Ordering::SeqCst);
            }
            taken
        };
        let Some(slot) = taken else {
            return false;
        };

        self.inner.pending.send_if_modified(|pending| {
            if pending.as_ref().is_some_and(|p| p.id == slot.id) {
                *pending = None;
                true
            } else {
                false
            }
        });
        info!(id = slot.id, "Action undone");
        true
    }

    pub fn pending(&self) -> Option<PendingUndo> {
        self.inner.pending.borrow().clone()
    }

    /// Progress of the pending action's window; 0 when nothing is pending.
    pub fn progress(&self) -> u8 {
        self.inner
            .pending
            .borrow()
            .as_ref()
            .map_or(0, PendingUndo::progress)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<PendingUndo>> {
        self.inner.pending.subscribe()
    }

    /// Wait until no action is pending (committed or undone).
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        let _ = rx.wait_for(Option::is_none).await;
    }
}
