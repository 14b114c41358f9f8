use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use cli::commands::{inbox, ConfigCommand, EmailsCommand, PensionCommand, SettingsCommand};
use cli::{render, AppContext};
use common::{init_logging, LoggingConfig, RequestContext};
use console::style;
use domain::config::DeskConfig;
use infrastructure::config::{ConfigLoader, ConfigValidator};
use std::path::PathBuf;
use tracing::{debug, Instrument};

#[derive(Parser)]
#[command(name = "pension-desk")]
#[command(about = "Staff desk for the pension email assistant")]
#[command(version)]
struct Cli {
    /// Configuration file to use before the standard locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides backend.base_url)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Auto-save quiet period in milliseconds (overrides autosave.delay_ms)
    #[arg(long, global = true)]
    autosave_delay_ms: Option<u64>,

    /// Log filter, e.g. `info` or `api=debug` (RUST_LOG wins over this)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and answer customer emails
    Emails(EmailsCommand),
    /// Show inbox counters
    Stats,
    /// Fetch new mail on the backend and classify it
    Sync,
    /// Pension information sheet
    Pension(PensionCommand),
    /// Reply style settings
    Settings(SettingsCommand),
    /// Configuration
    Config(ConfigCommand),
}

impl Cli {
    fn apply_overrides(&self, config: &mut DeskConfig) {
        if let Some(url) = &self.api_url {
            config.backend.base_url = url.clone();
        }
        if let Some(delay) = self.autosave_delay_ms {
            config.autosave.delay_ms = delay;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("✗").red(), render::error(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("config file {} not found", path.display());
        }
        loader = loader.with_path(path.clone());
    }

    let (mut config, source) = loader.load_with_source().await?;
    cli.apply_overrides(&mut config);
    ConfigValidator::new().validate(&config)?;

    init_logging(LoggingConfig {
        level: config.logging.level.clone(),
        json_output: config.logging.json,
        color_output: console::colors_enabled_stderr(),
    })?;
    debug!(%source, base_url = %config.backend.base_url, "Configuration resolved");

    let request = RequestContext::new();
    let span = request.span();

    async move {
        match cli.command {
            Commands::Config(cmd) => cmd.execute(&config, &source).await,
            Commands::Emails(cmd) => cmd.execute(&AppContext::new(config)?).await,
            Commands::Stats => inbox::stats(&AppContext::new(config)?).await,
            Commands::Sync => inbox::sync(&AppContext::new(config)?).await,
            Commands::Pension(cmd) => cmd.execute(&AppContext::new(config)?).await,
            Commands::Settings(cmd) => cmd.execute(&AppContext::new(config)?).await,
        }
    }
    .instrument(span)
    .await
}
