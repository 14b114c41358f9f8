//! Application Services
//!
//! Session objects the front end drives. Each owns its backend handle and
//! local state; none of them print or prompt.

pub mod autosave;
pub mod composer;
pub mod editor;
pub mod inbox;

pub use autosave::{AutoSaveScheduler, SaveStatus, SharedDocument};
pub use composer::ReplyComposer;
pub use editor::{DocumentEditor, PensionInfoEditor, ResponseSettingsEditor};
pub use inbox::Inbox;
