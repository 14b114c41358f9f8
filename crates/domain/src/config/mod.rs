use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for pension-desk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeskConfig {
    pub backend: BackendConfig,
    pub autosave: AutoSaveConfig,
    pub inbox: InboxConfig,
    pub reply: ReplyConfig,
    pub preview: PreviewConfig,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the email assistant API
    pub base_url: String,
    /// Per-request timeout; AI endpoints can take a while
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Quiet period after the last edit before a document is written
    pub delay_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self { delay_ms: 2000 }
    }
}

impl AutoSaveConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    pub default_limit: u32,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self { default_limit: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    pub include_signature: bool,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            include_signature: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Guest question used to render a reply preview
    pub sample_query: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            sample_query: "체크인 시간과 주차 가능 여부를 알고 싶습니다.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_editor_behaviour() {
        let config = DeskConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.autosave.delay(), Duration::from_secs(2));
        assert_eq!(config.inbox.default_limit, 50);
        assert!(config.reply.include_signature);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: DeskConfig = toml::from_str(
            r#"
[backend]
base_url = "http://desk.internal:9000"

[autosave]
delay_ms = 500
"#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://desk.internal:9000");
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.autosave.delay_ms, 500);
        assert_eq!(config.logging.level, "warn");
    }
}
