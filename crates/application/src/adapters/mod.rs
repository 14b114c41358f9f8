//! Adapters implementing the ports over [`api::BackendClient`].

mod backend_stores;

pub use backend_stores::{PensionInfoStore, ResponseSettingsStore};
