use anyhow::{Context, Result};
use domain::config::DeskConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::validator::ConfigValidator;

/// Where the file-level settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Variables read as `<prefix>API_URL`, `<prefix>TIMEOUT_SECS`, ...
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    autosave_delay_ms: Option<u64>,
    log_level: Option<String>,
    log_json: Option<bool>,
}

pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
    load_dotenv: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            env_prefix: "PENSION_DESK_".to_string(),
            load_dotenv: true,
        }
    }

    /// Search `path` before the standard locations.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.config_paths.insert(0, path);
        self
    }

    /// Only look at `paths`, in order.
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.load_dotenv = false;
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("pension-desk.toml"),
            PathBuf::from(".pension-desk.toml"),
            PathBuf::from("pension-desk.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("pension-desk").join("config.toml"));
            paths.push(home_dir.join(".config").join("pension-desk").join("config.json"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let toml_path = config_dir.join("pension-desk").join("config.toml");
            if !paths.contains(&toml_path) {
                paths.push(toml_path);
            }
        }

        paths
    }

    pub async fn load(&self) -> Result<DeskConfig> {
        self.load_with_source().await.map(|(config, _)| config)
    }

    /// Defaults, then the first config file found, then `.env` and
    /// environment overrides. The result is validated.
    pub async fn load_with_source(&self) -> Result<(DeskConfig, ConfigSource)> {
        if self.load_dotenv {
            match dotenv::dotenv() {
                Ok(path) => debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => debug!("No .env file found"),
                Err(e) => return Err(e).context("Failed to read .env file"),
            }
        }

        let (config, source) = self.load_base_config().await?;
        let config = self.apply_env_overrides(config)?;

        ConfigValidator::new().validate(&config)?;
        Ok((config, source))
    }

    async fn load_base_config(&self) -> Result<(DeskConfig, ConfigSource)> {
        for path in &self.config_paths {
            if path.exists() {
                let config = Self::load_file(path)
                    .await
                    .with_context(|| format!("Invalid config file {}", path.display()))?;
                info!("Loaded configuration from: {}", path.display());
                return Ok((config, ConfigSource::File(path.clone())));
            }
        }

        debug!("No config file found, using defaults");
        Ok((DeskConfig::default(), ConfigSource::Default))
    }

    async fn load_file(path: &Path) -> Result<DeskConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" | "" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => toml::from_str(&content)
                .or_else(|_| serde_json::from_str(&content))
                .context("Failed to parse config file"),
        }
    }

    fn apply_env_overrides(&self, mut config: DeskConfig) -> Result<DeskConfig> {
        let overrides: EnvOverrides = envy::prefixed(self.env_prefix.as_str())
            .from_env()
            .with_context(|| format!("Invalid {}* environment variable", self.env_prefix))?;

        if let Some(url) = overrides.api_url {
            config.backend.base_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            config.backend.timeout_secs = secs;
        }
        if let Some(ms) = overrides.autosave_delay_ms {
            config.autosave.delay_ms = ms;
        }
        if let Some(level) = overrides.log_level {
            config.logging.level = level;
        }
        if let Some(json) = overrides.log_json {
            config.logging.json = json;
        }

        Ok(config)
    }

    pub async fn save_config(&self, config: &DeskConfig, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        toml::to_string_pretty(&DeskConfig::default())
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
