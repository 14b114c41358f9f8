mod document;
mod email;
mod pension_info;
mod response_settings;

pub use document::EditableDocument;
pub use email::{Classification, Email, EmailFilter, EmailStats, EmailStatus, Priority, SyncOutcome};
pub use pension_info::{set_path, PensionInfo};
pub use response_settings::{ReplyLength, ReplyStructure, ReplyTone, ResponseSettings};
