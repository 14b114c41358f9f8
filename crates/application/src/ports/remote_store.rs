//! Remote Store Port
//!
//! Full-document persistence endpoint behind an editable document.

use api::Stored;
use async_trait::async_trait;
use common::DeskResult;

/// A backend record that is always read and written as a whole.
///
/// Writes are upserts with last-writer-wins semantics; no version token is
/// exchanged.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    type Document: Clone + Send + Sync + 'static;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    async fn load(&self) -> DeskResult<Stored<Self::Document>>;

    async fn save(&self, document: &Self::Document) -> DeskResult<()>;
}
