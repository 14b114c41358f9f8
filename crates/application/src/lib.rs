//! # Application Layer
//!
//! Editing sessions and inbox workflows on top of the backend client:
//! - Ports: the [`RemoteStore`](ports::RemoteStore) abstraction over a
//!   full-document load/upsert endpoint
//! - Adapters: stores for pension info and response settings
//! - Services: auto-save scheduling, document editors, reply composer, inbox
//!
//! ## Dependency Direction
//!
//! ```text
//! Application Layer → Domain Layer (entities, editing rules)
//! Application Layer → api (BackendClient) through adapters
//! ```

pub mod adapters;
pub mod ports;
pub mod services;

pub use adapters::{PensionInfoStore, ResponseSettingsStore};
pub use ports::RemoteStore;
pub use services::{
    AutoSaveScheduler, DocumentEditor, Inbox, PensionInfoEditor, ReplyComposer,
    ResponseSettingsEditor, SaveStatus,
};
