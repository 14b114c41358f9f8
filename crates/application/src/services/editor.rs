use chrono::{DateTime, Utc};
use common::{DeskError, DeskResult};
use domain::{EditableDocument, PensionInfo, ResponseSettings};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapters::{PensionInfoStore, ResponseSettingsStore};
use crate::ports::RemoteStore;
use crate::services::autosave::{AutoSaveScheduler, SaveStatus, SharedDocument};

/// An open editing session over one remote document.
///
/// Every edit goes through the local copy first and then arms the
/// auto-save timer; closing (or dropping) the editor disarms it.
pub struct DocumentEditor<S: RemoteStore> {
    store: Arc<S>,
    document: SharedDocument<S::Document>,
    scheduler: AutoSaveScheduler<S>,
}

impl<S: RemoteStore> DocumentEditor<S>
where
    S::Document: Default,
{
    /// Load the document and start a session. A failed load is logged and
    /// the session starts from defaults.
    pub async fn open(store: S, delay: Duration) -> Self {
        let document = match fetch(&store).await {
            Ok(document) => document,
            Err(e) => {
                warn!(store = store.name(), error = %e, "Failed to load document; starting from defaults");
                EditableDocument::default()
            }
        };
        Self::with_document(store, document, delay)
    }

    /// Load the document and start a session, failing if it cannot be
    /// read. Writers that never show the document first use this so a
    /// failed read is not followed by a save of defaults. A missing record
    /// has nothing to overwrite and starts from defaults.
    pub async fn load(store: S, delay: Duration) -> DeskResult<Self> {
        let document = match fetch(&store).await {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                info!(store = store.name(), "No stored document yet; starting from defaults");
                EditableDocument::default()
            }
            Err(e) => return Err(e),
        };
        Ok(Self::with_document(store, document, delay))
    }
}

async fn fetch<S: RemoteStore>(store: &S) -> DeskResult<EditableDocument<S::Document>> {
    let stored = store.load().await?;
    Ok(EditableDocument::loaded(stored.content, stored.updated_at))
}

impl<S: RemoteStore> DocumentEditor<S> {

    pub fn with_document(store: S, document: EditableDocument<S::Document>, delay: Duration) -> Self {
        let store = Arc::new(store);
        let document = Arc::new(Mutex::new(document));
        let scheduler = AutoSaveScheduler::new(Arc::clone(&store), Arc::clone(&document), delay);

        Self {
            store,
            document,
            scheduler,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn content(&self) -> S::Document {
        self.document.lock().content().clone()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.document.lock().last_saved_at()
    }

    pub fn status(&self) -> SaveStatus {
        self.scheduler.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.scheduler.subscribe()
    }

    pub fn has_pending_save(&self) -> bool {
        self.scheduler.has_pending()
    }

    pub fn edit<F>(&mut self, apply: F)
    where
        F: FnOnce(&mut S::Document),
    {
        let content = self.document.lock().edit(apply).clone();
        self.scheduler.on_edit(content);
    }

    /// Like [`edit`](Self::edit) for changes that can be rejected. A
    /// rejected change leaves the document as it was and schedules nothing.
    pub fn try_edit<F>(&mut self, apply: F) -> DeskResult<()>
    where
        F: FnOnce(&mut S::Document) -> DeskResult<()>,
    {
        let content = {
            let mut doc = self.document.lock();
            let mut draft = doc.content().clone();
            apply(&mut draft)?;
            doc.replace(draft).clone()
        };
        self.scheduler.on_edit(content);
        Ok(())
    }

    pub fn replace(&mut self, content: S::Document) {
        let content = self.document.lock().replace(content).clone();
        self.scheduler.on_edit(content);
    }

    /// Write the current content now, superseding any scheduled save.
    pub async fn save_now(&mut self) -> DeskResult<DateTime<Utc>> {
        let content = self.content();
        info!(store = self.store.name(), "Manual save requested");
        self.scheduler.save_now(content).await
    }

    /// End the session. A scheduled save that has not fired is discarded.
    pub fn close(mut self) {
        self.scheduler.cancel();
    }
}

pub type PensionInfoEditor = DocumentEditor<PensionInfoStore>;
pub type ResponseSettingsEditor = DocumentEditor<ResponseSettingsStore>;

impl DocumentEditor<PensionInfoStore> {
    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.edit(|info| info.raw_text = text);
    }

    pub fn set_analyzed_field(&mut self, path: &str, value: Value) -> DeskResult<()> {
        self.try_edit(|info| info.set_analyzed_field(path, value))
    }

    /// Ask the backend to structure the current free text. The result
    /// replaces the analysis and is auto-saved like any other edit.
    pub async fn analyze(&mut self) -> DeskResult<Value> {
        let current: PensionInfo = self.content();
        if current.is_blank() {
            return Err(DeskError::validation("pension information text is empty"));
        }

        let analyzed = self
            .store
            .client()
            .analyze_pension_info(&current.raw_text)
            .await?;

        let result = analyzed.clone();
        self.edit(|info| info.analyzed_info = Some(analyzed));
        Ok(result)
    }
}

impl DocumentEditor<ResponseSettingsStore> {
    pub fn set_field(&mut self, key: &str, value: &str) -> DeskResult<()> {
        self.try_edit(|settings| settings.set_field(key, value))
    }

    /// Render a sample reply with the current (possibly unsaved) settings.
    pub async fn preview(&self, sample_query: &str) -> DeskResult<String> {
        let settings: ResponseSettings = self.content();
        self.store
            .client()
            .response_preview(&settings, sample_query)
            .await
    }
}
