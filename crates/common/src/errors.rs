use thiserror::Error;

/// Error hierarchy shared by every pension-desk crate.
///
/// The front end collapses all variants into a single "operation failed"
/// message; the variants exist so logs and tests can tell them apart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeskError {
    /// The request never produced an HTTP response (connect, DNS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP error {code}: {message}")]
    Status { code: u16, message: String },

    /// The response body was missing fields or was not valid JSON.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Rejected locally before any request was issued.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type DeskResult<T> = Result<T, DeskError>;

impl DeskError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { code: 404, .. })
    }

    /// Whether the failure happened on the wire or at the backend, as opposed
    /// to a local rejection.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Decode(_)
        )
    }

    /// Message shown to the user; mirrors the single generic failure outcome.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            other => format!("operation failed: {other}"),
        }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
