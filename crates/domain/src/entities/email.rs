use common::DeskError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Workflow state of an email as stored by the backend.
///
/// Unknown values are kept verbatim so a newer backend never breaks the list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmailStatus {
    #[default]
    Unread,
    Read,
    Replied,
    Archived,
    Other(String),
}

impl EmailStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for EmailStatus {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "unread" => Self::Unread,
            "read" => Self::Read,
            "replied" => Self::Replied,
            "archived" => Self::Archived,
            _ => Self::Other(value),
        }
    }
}

impl From<EmailStatus> for String {
    fn from(status: EmailStatus) -> Self {
        status.as_str().to_string()
    }
}

impl FromStr for EmailStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for EmailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output bucket. `general` is the backend's fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Urgent,
    Support,
    General,
    Sales,
    Spam,
    Other(String),
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Urgent => "urgent",
            Self::Support => "support",
            Self::General => "general",
            Self::Sales => "sales",
            Self::Spam => "spam",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "urgent" => Self::Urgent,
            "support" => Self::Support,
            "general" => Self::General,
            "sales" => Self::Sales,
            "spam" => Self::Spam,
            _ => Self::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An email as returned by `GET /emails` and `GET /emails/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default)]
    pub body: String,
    pub received_at: String,
    #[serde(default)]
    pub status: EmailStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Email {
    /// Display name falling back to the address.
    pub fn sender(&self) -> &str {
        self.sender_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.sender_email)
    }

    pub fn apply_classification(&mut self, classification: &Classification) {
        self.priority = Some(classification.priority.clone());
        self.tags = classification.tags.clone();
    }
}

/// Result of `POST /emails/{id}/classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Aggregate counters from `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub unread: u64,
    #[serde(default)]
    pub replied: u64,
    #[serde(default)]
    pub archived: u64,
    #[serde(default)]
    pub priority_distribution: HashMap<String, u64>,
    #[serde(default)]
    pub recent: Option<u64>,
    #[serde(default)]
    pub avg_response_time: Option<f64>,
}

/// Result of `POST /sync`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub processed_count: u64,
}

/// Dashboard list filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmailFilter {
    #[default]
    All,
    Unread,
    Urgent,
    Status(EmailStatus),
}

impl EmailFilter {
    pub fn matches(&self, email: &Email) -> bool {
        match self {
            Self::All => true,
            Self::Unread => email.status == EmailStatus::Unread,
            Self::Urgent => email.priority == Some(Priority::Urgent),
            Self::Status(status) => &email.status == status,
        }
    }

    /// Filters shown in the dashboard header, in display order.
    pub fn dashboard() -> [EmailFilter; 4] {
        [
            Self::All,
            Self::Unread,
            Self::Urgent,
            Self::Status(EmailStatus::Replied),
        ]
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => "All Emails".to_string(),
            Self::Unread => "Unread".to_string(),
            Self::Urgent => "Urgent".to_string(),
            Self::Status(status) => {
                let mut chars = status.as_str().chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }

    pub fn count(&self, emails: &[Email]) -> usize {
        emails.iter().filter(|email| self.matches(email)).count()
    }
}

impl EmailFilter {
    /// Names accepted by `FromStr`.
    pub const NAMES: [&'static str; 6] = ["all", "unread", "urgent", "read", "replied", "archived"];
}

impl FromStr for EmailFilter {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "unread" => Ok(Self::Unread),
            "urgent" => Ok(Self::Urgent),
            "read" => Ok(Self::Status(EmailStatus::Read)),
            "replied" => Ok(Self::Status(EmailStatus::Replied)),
            "archived" => Ok(Self::Status(EmailStatus::Archived)),
            other => Err(DeskError::validation(format!(
                "unknown filter '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(id: &str, status: EmailStatus, priority: Option<Priority>) -> Email {
        Email {
            id: id.to_string(),
            subject: "Check-in time".to_string(),
            sender_email: "guest@example.com".to_string(),
            sender_name: None,
            body: "When can we check in?".to_string(),
            received_at: "2024-07-01T10:00:00".to_string(),
            status,
            priority,
            tags: vec![],
        }
    }

    #[test]
    fn test_email_deserializes_with_defaults() {
        let json = r#"{
            "id": "abc",
            "subject": "Parking",
            "sender_email": "guest@example.com",
            "received_at": "2024-07-01T10:00:00"
        }"#;

        let email: Email = serde_json::from_str(json).unwrap();
        assert_eq!(email.status, EmailStatus::Unread);
        assert_eq!(email.priority, None);
        assert!(email.tags.is_empty());
        assert_eq!(email.sender(), "guest@example.com");
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: EmailStatus = serde_json::from_str("\"snoozed\"").unwrap();
        assert_eq!(status, EmailStatus::Other("snoozed".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"snoozed\"");
    }

    #[test]
    fn test_priority_parsing_is_case_insensitive() {
        let priority: Priority = serde_json::from_str("\"URGENT\"").unwrap();
        assert_eq!(priority, Priority::Urgent);
        assert_eq!(priority.to_string(), "urgent");
    }

    #[test]
    fn test_dashboard_filters() {
        let emails = vec![
            email("1", EmailStatus::Unread, Some(Priority::Urgent)),
            email("2", EmailStatus::Read, Some(Priority::General)),
            email("3", EmailStatus::Replied, Some(Priority::Urgent)),
            email("4", EmailStatus::Unread, None),
        ];

        let counts: Vec<usize> = EmailFilter::dashboard()
            .iter()
            .map(|filter| filter.count(&emails))
            .collect();
        assert_eq!(counts, vec![4, 2, 2, 1]);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("unread".parse::<EmailFilter>().unwrap(), EmailFilter::Unread);
        assert_eq!(
            "archived".parse::<EmailFilter>().unwrap(),
            EmailFilter::Status(EmailStatus::Archived)
        );
        assert_eq!(
            EmailFilter::Status(EmailStatus::Replied).label(),
            "Replied"
        );
    }

    #[test]
    fn test_filter_rejects_typos() {
        let err = "unred".parse::<EmailFilter>().unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
        assert!(err.to_string().contains("unread"));
        assert_eq!(" Urgent ".parse::<EmailFilter>().unwrap(), EmailFilter::Urgent);
    }

    #[test]
    fn test_apply_classification() {
        let mut email = email("1", EmailStatus::Read, None);
        email.apply_classification(&Classification {
            priority: Priority::Support,
            tags: vec!["parking".to_string()],
            confidence: Some(0.9),
        });

        assert_eq!(email.priority, Some(Priority::Support));
        assert_eq!(email.tags, vec!["parking".to_string()]);
    }

    #[test]
    fn test_stats_tolerate_missing_fields() {
        let stats: EmailStats = serde_json::from_str(r#"{"total": 5, "unread": 2}"#).unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.replied, 0);
        assert!(stats.priority_distribution.is_empty());
    }
}
