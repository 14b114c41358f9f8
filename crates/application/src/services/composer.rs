use api::{BackendClient, MessageResponse, ReplyContext};
use common::{DeskError, DeskResult};
use tracing::{info, warn};

/// Reply draft for a single email.
///
/// Generation only ever fills the draft; nothing leaves the desk until
/// [`send`](ReplyComposer::send) is called.
#[derive(Debug, Clone)]
pub struct ReplyComposer {
    client: BackendClient,
    email_id: String,
    include_signature: bool,
    draft: String,
}

impl ReplyComposer {
    pub fn new(client: BackendClient, email_id: impl Into<String>, include_signature: bool) -> Self {
        Self {
            client,
            email_id: email_id.into(),
            include_signature,
            draft: String::new(),
        }
    }

    pub fn email_id(&self) -> &str {
        &self.email_id
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Generate a reply using the stored response settings. If the settings
    /// cannot be loaded the backend falls back to its own defaults.
    pub async fn generate(&mut self) -> DeskResult<&str> {
        let settings = match self.client.response_settings().await {
            Ok(stored) => Some(stored.content),
            Err(e) => {
                warn!(error = %e, "Failed to load response settings; generating without them");
                None
            }
        };

        let context = ReplyContext::new(settings.as_ref(), self.include_signature);
        let reply = self.client.generate_reply(&self.email_id, &context).await?;

        info!(email_id = %self.email_id, chars = reply.chars().count(), "Reply draft generated");
        self.draft = reply;
        Ok(&self.draft)
    }

    pub async fn send(&self) -> DeskResult<MessageResponse> {
        if self.draft.trim().is_empty() {
            return Err(DeskError::validation("reply is empty"));
        }
        self.client.send_reply(&self.email_id, &self.draft).await
    }
}
