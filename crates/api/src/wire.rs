//! Request and response bodies that only exist on the wire.
//!
//! Records the rest of the workspace works with live in `domain`; these
//! types wrap them the way the backend expects.

use chrono::{DateTime, NaiveDateTime, Utc};
use domain::{PensionInfo, ResponseSettings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate<'a> {
    pub status: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendReplyRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Options the reply generator understands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyContext {
    /// Settings object as stored by the backend; `{}` when unavailable.
    pub response_settings: Value,
    pub include_signature: bool,
}

impl ReplyContext {
    pub fn new(settings: Option<&ResponseSettings>, include_signature: bool) -> Self {
        let response_settings = settings
            .and_then(|s| serde_json::to_value(s).ok())
            .unwrap_or_else(|| Value::Object(Default::default()));
        Self {
            response_settings,
            include_signature,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateReplyRequest<'a> {
    pub context: &'a ReplyContext,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateReplyResponse {
    pub reply: String,
}

/// A record together with the backend's last-write time.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub content: T,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PensionInfoRecord {
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub analyzed_info: Option<Value>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<PensionInfoRecord> for Stored<PensionInfo> {
    fn from(record: PensionInfoRecord) -> Self {
        Self {
            content: PensionInfo {
                raw_text: record.raw_text.unwrap_or_default(),
                analyzed_info: record.analyzed_info.filter(|v| !v.is_null()),
            },
            updated_at: record.updated_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    pub analyzed_info: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseSettingsRecord {
    #[serde(default)]
    pub settings: Option<ResponseSettings>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<ResponseSettingsRecord> for Stored<ResponseSettings> {
    fn from(record: ResponseSettingsRecord) -> Self {
        Self {
            content: record.settings.unwrap_or_default(),
            updated_at: record.updated_at.as_deref().and_then(parse_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SettingsEnvelope<'a> {
    pub settings: &'a ResponseSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PreviewRequest<'a> {
    pub settings: &'a ResponseSettings,
    pub sample_query: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewResponse {
    pub preview: String,
}

/// FastAPI error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Value,
}

/// Parse a backend timestamp. Naive ISO timestamps are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
