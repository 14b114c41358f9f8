//! Debounce behaviour of the auto-save scheduler, driven on a paused clock.

use api::Stored;
use application::{AutoSaveScheduler, DocumentEditor, RemoteStore};
use async_trait::async_trait;
use common::{DeskError, DeskResult};
use domain::EditableDocument;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const DELAY: Duration = Duration::from_millis(2000);

#[derive(Clone, Default)]
struct RecordingStore {
    writes: Arc<Mutex<Vec<String>>>,
    fail: bool,
    latency: Option<Duration>,
    initial: Option<Stored<String>>,
}

impl RecordingStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn slow(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl RemoteStore for RecordingStore {
    type Document = String;

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn load(&self) -> DeskResult<Stored<String>> {
        self.initial
            .clone()
            .ok_or_else(|| DeskError::Transport("connection refused".into()))
    }

    async fn save(&self, document: &String) -> DeskResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail {
            return Err(DeskError::status(500, "database unavailable"));
        }
        self.writes.lock().push(document.clone());
        Ok(())
    }
}

fn new_scheduler(store: &RecordingStore) -> (AutoSaveScheduler<RecordingStore>, Arc<Mutex<EditableDocument<String>>>) {
    let document = Arc::new(Mutex::new(EditableDocument::new(String::new())));
    let scheduler = AutoSaveScheduler::new(Arc::new(store.clone()), Arc::clone(&document), DELAY);
    (scheduler, document)
}

async fn wait(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_writes_last_value_once() {
    let store = RecordingStore::default();
    let (mut scheduler, _doc) = new_scheduler(&store);

    for text in ["h", "he", "hel", "hell", "hello"] {
        scheduler.on_edit(text.to_string());
        wait(Duration::from_millis(500)).await;
    }
    assert!(store.writes().is_empty());

    wait(DELAY * 2).await;
    assert_eq!(store.writes(), vec!["hello".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_edits_further_apart_than_delay_write_separately() {
    let store = RecordingStore::default();
    let (mut scheduler, _doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    wait(DELAY + Duration::from_millis(100)).await;
    scheduler.on_edit("B".into());
    wait(DELAY + Duration::from_millis(100)).await;

    assert_eq!(store.writes(), vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_second_edit_within_delay_supersedes_first() {
    let store = RecordingStore::default();
    let (mut scheduler, _doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    wait(DELAY / 2).await;
    scheduler.on_edit("B".into());
    wait(DELAY * 3).await;

    assert_eq!(store.writes(), vec!["B".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_no_write_before_quiet_period_elapses() {
    let store = RecordingStore::default();
    let (mut scheduler, _doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    assert!(scheduler.has_pending());
    assert!(scheduler.status().pending);

    wait(DELAY - Duration::from_millis(1)).await;
    assert!(store.writes().is_empty());

    wait(Duration::from_millis(10)).await;
    assert_eq!(store.writes(), vec!["A".to_string()]);
    assert!(!scheduler.status().pending);
}

#[tokio::test(start_paused = true)]
async fn test_manual_save_cancels_pending_timer() {
    let store = RecordingStore::default();
    let (mut scheduler, doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    wait(DELAY / 4).await;
    let saved_at = scheduler.save_now("A!".into()).await.unwrap();

    assert_eq!(store.writes(), vec!["A!".to_string()]);
    assert_eq!(doc.lock().last_saved_at(), Some(saved_at));

    wait(DELAY * 3).await;
    assert_eq!(store.writes(), vec!["A!".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_scheduler_discards_pending_save() {
    let store = RecordingStore::default();
    let (mut scheduler, _doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    wait(DELAY / 2).await;
    drop(scheduler);

    wait(DELAY * 3).await;
    assert!(store.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_discards_pending_save() {
    let store = RecordingStore::default();
    let (mut scheduler, _doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    scheduler.cancel();
    assert!(!scheduler.has_pending());

    wait(DELAY * 3).await;
    assert!(store.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_write_survives_new_edit_and_drop() {
    let store = RecordingStore::slow(Duration::from_secs(5));
    let (mut scheduler, _doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    wait(DELAY + Duration::from_millis(10)).await;
    assert_eq!(scheduler.status().in_flight, 1);

    scheduler.on_edit("B".into());
    drop(scheduler);

    wait(Duration::from_secs(10)).await;
    assert_eq!(store.writes(), vec!["A".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_leaves_last_saved_untouched() {
    let store = RecordingStore::failing();
    let (mut scheduler, doc) = new_scheduler(&store);

    scheduler.on_edit("A".into());
    wait(DELAY * 2).await;

    assert!(doc.lock().last_saved_at().is_none());
    let status = scheduler.status();
    assert_eq!(status.failed_writes, 1);
    assert_eq!(status.completed_writes, 0);
    assert!(status.last_saved_at.is_none());
    assert!(status.last_error.as_deref().unwrap().contains("database unavailable"));

    // Not retried.
    wait(DELAY * 5).await;
    assert_eq!(scheduler.status().failed_writes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_manual_save_is_returned() {
    let store = RecordingStore::failing();
    let (mut scheduler, doc) = new_scheduler(&store);

    let err = scheduler.save_now("A".into()).await.unwrap_err();
    assert_eq!(err, DeskError::status(500, "database unavailable"));
    assert!(doc.lock().last_saved_at().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_successful_write_sets_last_saved_after_completion() {
    let store = RecordingStore::default();
    let (mut scheduler, doc) = new_scheduler(&store);
    let mut status = scheduler.subscribe();

    let before = chrono::Utc::now();
    scheduler.on_edit("A".into());
    wait(DELAY * 2).await;

    let saved = doc.lock().last_saved_at().unwrap();
    assert!(saved >= before);
    assert!(status.has_changed().unwrap());
    assert_eq!(status.borrow_and_update().last_saved_at, Some(saved));
}

#[tokio::test(start_paused = true)]
async fn test_editor_falls_back_to_default_when_load_fails() {
    let store = RecordingStore::default();
    let editor = DocumentEditor::open(store, DELAY).await;

    assert_eq!(editor.content(), "");
    assert!(editor.last_saved_at().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_editor_edits_schedule_and_close_discards() {
    let store = RecordingStore {
        initial: Some(Stored {
            content: "checkin 15:00".to_string(),
            updated_at: None,
        }),
        ..RecordingStore::default()
    };
    let mut editor = DocumentEditor::open(store.clone(), DELAY).await;
    assert_eq!(editor.content(), "checkin 15:00");

    editor.edit(|text| text.push_str(", checkout 11:00"));
    wait(DELAY * 2).await;
    assert_eq!(store.writes(), vec!["checkin 15:00, checkout 11:00".to_string()]);
    assert!(editor.last_saved_at().is_some());

    editor.replace("draft".into());
    assert!(editor.has_pending_save());
    editor.close();

    wait(DELAY * 2).await;
    assert_eq!(store.writes().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_edit_changes_nothing() {
    let store = RecordingStore::default();
    let document = EditableDocument::new("kept".to_string());
    let mut editor = DocumentEditor::with_document(store.clone(), document, DELAY);

    let err = editor
        .try_edit(|text| {
            text.clear();
            Err(DeskError::validation("nope"))
        })
        .unwrap_err();

    assert!(matches!(err, DeskError::Validation(_)));
    assert_eq!(editor.content(), "kept");
    assert!(!editor.has_pending_save());

    wait(DELAY * 2).await;
    assert!(store.writes().is_empty());
}
