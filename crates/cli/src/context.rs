use anyhow::{Context, Result};
use api::BackendClient;
use domain::config::DeskConfig;

/// What every command needs: the resolved configuration and a client for
/// the backend it points at.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: DeskConfig,
    pub client: BackendClient,
}

impl AppContext {
    pub fn new(config: DeskConfig) -> Result<Self> {
        let client = BackendClient::from_config(&config.backend)
            .with_context(|| format!("Invalid backend URL '{}'", config.backend.base_url))?;
        Ok(Self { config, client })
    }
}
