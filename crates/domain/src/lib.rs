//! Domain Layer - pension-desk records and editing rules
//!
//! Holds the client-side mirrors of the backend records and the pure rules
//! that operate on them. Nothing here performs I/O:
//! - Entities: emails, pension info, response settings
//! - EditableDocument: local copy of a record plus its last confirmed save
//! - Config: the typed configuration tree loaded by `infrastructure`

pub mod config;
pub mod entities;

pub use config::DeskConfig;
pub use entities::{
    Classification, EditableDocument, Email, EmailFilter, EmailStats, EmailStatus, PensionInfo,
    Priority, ReplyLength, ReplyStructure, ReplyTone, ResponseSettings, SyncOutcome,
};
