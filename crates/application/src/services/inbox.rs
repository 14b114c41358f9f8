use api::{BackendClient, MessageResponse};
use common::DeskResult;
use domain::{Classification, Email, EmailFilter, EmailStats, EmailStatus, SyncOutcome};
use tracing::{info, warn};

/// Dashboard state: the email list, the counters and the active filter.
#[derive(Debug, Clone)]
pub struct Inbox {
    client: BackendClient,
    limit: u32,
    emails: Vec<Email>,
    stats: EmailStats,
    filter: EmailFilter,
}

impl Inbox {
    pub fn new(client: BackendClient, limit: u32) -> Self {
        Self {
            client,
            limit,
            emails: Vec::new(),
            stats: EmailStats::default(),
            filter: EmailFilter::All,
        }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn stats(&self) -> &EmailStats {
        &self.stats
    }

    pub fn filter(&self) -> &EmailFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: EmailFilter) {
        self.filter = filter;
    }

    /// Emails passing the active filter.
    pub fn visible(&self) -> Vec<&Email> {
        self.emails
            .iter()
            .filter(|email| self.filter.matches(email))
            .collect()
    }

    /// Dashboard header: each filter with the number of emails it matches.
    pub fn filter_counts(&self) -> Vec<(EmailFilter, usize)> {
        EmailFilter::dashboard()
            .into_iter()
            .map(|filter| {
                let count = filter.count(&self.emails);
                (filter, count)
            })
            .collect()
    }

    pub fn find(&self, email_id: &str) -> Option<&Email> {
        self.emails.iter().find(|email| email.id == email_id)
    }

    /// Reload list and counters. Each half fails independently and keeps the
    /// previous state on failure.
    pub async fn refresh(&mut self) {
        let (emails, stats) = tokio::join!(
            self.client.list_emails(self.limit, None),
            self.client.stats()
        );

        match emails {
            Ok(emails) => self.emails = emails,
            Err(e) => warn!(error = %e, "Failed to load emails"),
        }
        match stats {
            Ok(stats) => self.stats = stats,
            Err(e) => warn!(error = %e, "Failed to load stats"),
        }
    }

    pub async fn sync(&mut self) -> DeskResult<SyncOutcome> {
        let outcome = self.client.sync().await?;
        info!(processed = outcome.processed_count, "Mailbox synced");
        self.refresh().await;
        Ok(outcome)
    }

    /// Fetch an email's detail. Unread mail is marked read; if that update
    /// fails the email is still returned as it was.
    pub async fn open(&mut self, email_id: &str) -> DeskResult<Email> {
        let mut email = self.client.get_email(email_id).await?;

        if email.status == EmailStatus::Unread {
            match self.client.update_status(email_id, &EmailStatus::Read).await {
                Ok(_) => {
                    email.status = EmailStatus::Read;
                    self.set_local_status(email_id, EmailStatus::Read);
                }
                Err(e) => warn!(email_id, error = %e, "Failed to mark email as read"),
            }
        }

        Ok(email)
    }

    pub async fn classify(&mut self, email_id: &str) -> DeskResult<Classification> {
        let classification = self.client.classify_email(email_id).await?;
        if let Some(email) = self.emails.iter_mut().find(|email| email.id == email_id) {
            email.apply_classification(&classification);
        }
        Ok(classification)
    }

    pub async fn archive(&mut self, email_id: &str) -> DeskResult<MessageResponse> {
        let response = self
            .client
            .update_status(email_id, &EmailStatus::Archived)
            .await?;
        self.set_local_status(email_id, EmailStatus::Archived);
        Ok(response)
    }

    pub async fn send_reply(&mut self, email_id: &str, content: &str) -> DeskResult<MessageResponse> {
        let response = self.client.send_reply(email_id, content).await?;
        self.set_local_status(email_id, EmailStatus::Replied);
        Ok(response)
    }

    fn set_local_status(&mut self, email_id: &str, status: EmailStatus) {
        if let Some(email) = self.emails.iter_mut().find(|email| email.id == email_id) {
            email.status = status;
        }
    }
}
