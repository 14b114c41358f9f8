use anyhow::{bail, Result};
use domain::config::*;
use tracing::warn;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &DeskConfig) -> Result<()> {
        self.validate_backend_config(&config.backend)?;
        self.validate_autosave_config(&config.autosave)?;
        self.validate_inbox_config(&config.inbox)?;
        self.validate_logging_config(&config.logging)?;

        if config.preview.sample_query.trim().is_empty() {
            warn!("preview.sample_query is empty; previews will have nothing to answer");
        }
        Ok(())
    }

    fn validate_backend_config(&self, config: &BackendConfig) -> Result<()> {
        let url = config.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("backend.base_url must start with http:// or https://, got '{url}'");
        }

        if config.timeout_secs == 0 {
            bail!("backend.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    fn validate_autosave_config(&self, config: &AutoSaveConfig) -> Result<()> {
        if config.delay_ms == 0 {
            bail!("autosave.delay_ms must be greater than 0");
        }

        if config.delay_ms < 200 {
            warn!(
                "autosave.delay_ms = {} will write on almost every keystroke",
                config.delay_ms
            );
        }

        Ok(())
    }

    fn validate_inbox_config(&self, config: &InboxConfig) -> Result<()> {
        if config.default_limit == 0 {
            bail!("inbox.default_limit must be greater than 0");
        }
        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingSettings) -> Result<()> {
        // Full filter directives (`api=debug,warn`) are passed to the
        // subscriber untouched.
        if config.level.contains('=') || config.level.contains(',') {
            return Ok(());
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace", "off"];
        if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
            bail!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.level,
                valid_levels
            );
        }

        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
