//! Trailing-debounce auto-save.
//!
//! A burst of edits closer together than `delay` produces exactly one write,
//! carrying the content of the last edit. Timers are owned by the scheduler
//! and die with it; writes that already left for the backend are never
//! cancelled.

use chrono::{DateTime, Utc};
use common::DeskResult;
use domain::EditableDocument;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::ports::RemoteStore;

pub type SharedDocument<T> = Arc<Mutex<EditableDocument<T>>>;

/// Snapshot of a scheduler's persistence state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveStatus {
    pub last_saved_at: Option<DateTime<Utc>>,
    /// A timer is armed and has not fired yet.
    pub pending: bool,
    pub in_flight: usize,
    pub completed_writes: u64,
    pub failed_writes: u64,
    /// Message of the most recent failed write; cleared by the next success.
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveTrigger {
    Timer,
    Manual,
}

impl SaveTrigger {
    fn as_str(self) -> &'static str {
        match self {
            Self::Timer => "auto",
            Self::Manual => "manual",
        }
    }
}

pub struct AutoSaveScheduler<S: RemoteStore> {
    store: Arc<S>,
    document: SharedDocument<S::Document>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    status: Arc<watch::Sender<SaveStatus>>,
}

impl<S: RemoteStore> AutoSaveScheduler<S> {
    pub fn new(store: Arc<S>, document: SharedDocument<S::Document>, delay: Duration) -> Self {
        let initial = SaveStatus {
            last_saved_at: document.lock().last_saved_at(),
            ..SaveStatus::default()
        };
        let (status, _) = watch::channel(initial);

        Self {
            store,
            document,
            delay,
            pending: None,
            status: Arc::new(status),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Record `content` as the value to persist and restart the quiet
    /// period. Never touches the network itself.
    pub fn on_edit(&mut self, content: S::Document) {
        self.abort_pending();

        let store = Arc::clone(&self.store);
        let document = Arc::clone(&self.document);
        let status = Arc::clone(&self.status);
        let delay = self.delay;

        status.send_modify(|s| s.pending = true);
        debug!(store = store.name(), delay_ms = delay.as_millis() as u64, "Auto-save scheduled");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            status.send_modify(|s| s.pending = false);
            // Detached so that aborting this timer can never cut a write short.
            tokio::spawn(async move {
                let _ = persist(&*store, &document, &status, content, SaveTrigger::Timer).await;
            });
        }));
    }

    /// Cancel any armed timer and write `content` right away. The outcome is
    /// returned so the caller can report it.
    pub async fn save_now(&mut self, content: S::Document) -> DeskResult<DateTime<Utc>> {
        self.cancel();
        persist(&*self.store, &self.document, &self.status, content, SaveTrigger::Manual).await
    }

    /// Drop the armed timer without writing. In-flight writes continue.
    pub fn cancel(&mut self) {
        if self.abort_pending() {
            debug!(store = self.store.name(), "Pending auto-save cancelled");
        }
        self.status.send_modify(|s| s.pending = false);
    }

    fn abort_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl<S: RemoteStore> Drop for AutoSaveScheduler<S> {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

async fn persist<S: RemoteStore>(
    store: &S,
    document: &SharedDocument<S::Document>,
    status: &watch::Sender<SaveStatus>,
    content: S::Document,
    trigger: SaveTrigger,
) -> DeskResult<DateTime<Utc>> {
    status.send_modify(|s| s.in_flight += 1);
    let result = store.save(&content).await;

    match result {
        Ok(()) => {
            let saved_at = Utc::now();
            let last_saved_at = {
                let mut doc = document.lock();
                doc.mark_saved(saved_at);
                doc.last_saved_at()
            };
            status.send_modify(|s| {
                s.in_flight -= 1;
                s.completed_writes += 1;
                s.last_saved_at = last_saved_at;
                s.last_error = None;
            });
            debug!(store = store.name(), trigger = trigger.as_str(), "Document saved");
            Ok(saved_at)
        }
        Err(e) => {
            match trigger {
                SaveTrigger::Timer => {
                    warn!(store = store.name(), error = %e, "Auto-save failed; edit not persisted")
                }
                SaveTrigger::Manual => error!(store = store.name(), error = %e, "Save failed"),
            }
            status.send_modify(|s| {
                s.in_flight -= 1;
                s.failed_writes += 1;
                s.last_error = Some(e.user_message());
            });
            Err(e)
        }
    }
}
