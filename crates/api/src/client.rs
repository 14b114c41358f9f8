use common::{DeskError, DeskResult, OperationTimer};
use domain::config::BackendConfig;
use domain::{Classification, Email, EmailStats, EmailStatus, PensionInfo, ResponseSettings, SyncOutcome};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::wire::{
    AnalyzeRequest, AnalyzeResponse, ErrorBody, GenerateReplyRequest, GenerateReplyResponse,
    MessageResponse, PensionInfoRecord, PreviewRequest, PreviewResponse, ReplyContext,
    ResponseSettingsRecord, SendReplyRequest, SettingsEnvelope, StatusUpdate, Stored,
};

/// HTTP client for the email assistant backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct BackendClient {
    base_url: String,
    root: Url,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> DeskResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DeskError::Config(format!(
                "backend URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let root = Url::parse(&base_url)
            .map_err(|e| DeskError::Config(format!("invalid backend URL '{base_url}': {e}")))?;
        if root.cannot_be_a_base() {
            return Err(DeskError::Config(format!("backend URL '{base_url}' cannot carry a path")));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeskError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            root,
            client,
        })
    }

    pub fn from_config(config: &BackendConfig) -> DeskResult<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/emails/{id}` plus an optional action segment. The id is pushed as
    /// one encoded segment so `/` or `?` in it cannot change the route.
    fn email_url(&self, email_id: &str, action: Option<&str>) -> Url {
        let mut url = self.root.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("emails").push(email_id);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        url
    }

    // === Emails ===

    pub async fn list_emails(&self, limit: u32, status: Option<&EmailStatus>) -> DeskResult<Vec<Email>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        let request = self.client.get(self.url("/emails")).query(&query);
        self.execute("list_emails", request).await
    }

    pub async fn get_email(&self, email_id: &str) -> DeskResult<Email> {
        let request = self.client.get(self.email_url(email_id, None));
        self.execute("get_email", request).await
    }

    pub async fn classify_email(&self, email_id: &str) -> DeskResult<Classification> {
        info!(email_id, "Requesting classification");
        let request = self
            .client
            .post(self.email_url(email_id, Some("classify")));
        self.execute("classify_email", request).await
    }

    pub async fn generate_reply(&self, email_id: &str, context: &ReplyContext) -> DeskResult<String> {
        info!(email_id, "Requesting generated reply");
        debug!(?context, "Reply context");
        let request = self
            .client
            .post(self.email_url(email_id, Some("generate-reply")))
            .json(&GenerateReplyRequest { context });
        let response: GenerateReplyResponse = self.execute("generate_reply", request).await?;
        Ok(response.reply)
    }

    pub async fn update_status(&self, email_id: &str, status: &EmailStatus) -> DeskResult<MessageResponse> {
        let request = self
            .client
            .put(self.email_url(email_id, None))
            .json(&StatusUpdate {
                status: status.as_str(),
            });
        self.execute("update_status", request).await
    }

    pub async fn send_reply(&self, email_id: &str, content: &str) -> DeskResult<MessageResponse> {
        info!(email_id, chars = content.chars().count(), "Sending reply");
        let request = self
            .client
            .post(self.email_url(email_id, Some("send-reply")))
            .json(&SendReplyRequest { content });
        self.execute("send_reply", request).await
    }

    pub async fn stats(&self) -> DeskResult<EmailStats> {
        let request = self.client.get(self.url("/stats"));
        self.execute("stats", request).await
    }

    pub async fn sync(&self) -> DeskResult<SyncOutcome> {
        let request = self.client.post(self.url("/sync"));
        self.execute("sync", request).await
    }

    // === Pension info ===

    pub async fn pension_info(&self) -> DeskResult<Stored<PensionInfo>> {
        let request = self.client.get(self.url("/pension-info"));
        let record: PensionInfoRecord = self.execute("pension_info", request).await?;
        Ok(record.into())
    }

    pub async fn save_pension_info(&self, info: &PensionInfo) -> DeskResult<()> {
        let request = self.client.post(self.url("/pension-info")).json(info);
        self.execute_unit("save_pension_info", request).await
    }

    pub async fn analyze_pension_info(&self, text: &str) -> DeskResult<Value> {
        let request = self
            .client
            .post(self.url("/pension-info/analyze"))
            .json(&AnalyzeRequest { text });
        let response: AnalyzeResponse = self.execute("analyze_pension_info", request).await?;
        Ok(response.analyzed_info)
    }

    // === Response settings ===

    pub async fn response_settings(&self) -> DeskResult<Stored<ResponseSettings>> {
        let request = self.client.get(self.url("/response-settings"));
        let record: ResponseSettingsRecord = self.execute("response_settings", request).await?;
        Ok(record.into())
    }

    pub async fn save_response_settings(&self, settings: &ResponseSettings) -> DeskResult<()> {
        let request = self
            .client
            .post(self.url("/response-settings"))
            .json(&SettingsEnvelope { settings });
        self.execute_unit("save_response_settings", request).await
    }

    pub async fn response_preview(&self, settings: &ResponseSettings, sample_query: &str) -> DeskResult<String> {
        let request = self
            .client
            .post(self.url("/response-preview"))
            .json(&PreviewRequest {
                settings,
                sample_query,
            });
        let response: PreviewResponse = self.execute("response_preview", request).await?;
        Ok(response.preview)
    }

    // === Transport ===

    async fn execute<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> DeskResult<T> {
        let timer = OperationTimer::new(operation);
        let result = async {
            let response = self.checked(request).await?;
            let bytes = response.bytes().await.map_err(transport_error)?;
            serde_json::from_slice::<T>(&bytes).map_err(|e| DeskError::Decode(e.to_string()))
        }
        .await;
        timer.finish_with_result(&result);
        result
    }

    /// For writes whose response body carries nothing the caller needs.
    async fn execute_unit(&self, operation: &str, request: RequestBuilder) -> DeskResult<()> {
        let timer = OperationTimer::new(operation);
        let result = self.checked(request).await.map(|_| ());
        timer.finish_with_result(&result);
        result
    }

    async fn checked(&self, request: RequestBuilder) -> DeskResult<reqwest::Response> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        error!(status = status.as_u16(), %message, "Backend returned an error");
        Err(DeskError::status(status.as_u16(), message))
    }
}

fn transport_error(err: reqwest::Error) -> DeskError {
    if err.is_decode() {
        DeskError::Decode(err.to_string())
    } else {
        DeskError::Transport(err.to_string())
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| match parsed.detail {
            Value::String(text) => text,
            other => other.to_string(),
        });

    match detail {
        Some(detail) if !detail.is_empty() => detail,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
