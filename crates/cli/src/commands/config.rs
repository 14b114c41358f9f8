use anyhow::Result;
use clap::{Args, Subcommand};
use domain::config::DeskConfig;
use infrastructure::config::{ConfigLoader, ConfigSource};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the resolved configuration (files, .env, environment and flags)
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Print an example configuration, or write it with --output
    #[command(alias = "gen")]
    Example {
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    /// Config commands work without a reachable backend, so they receive the
    /// resolved configuration rather than an `AppContext`.
    pub async fn execute(&self, config: &DeskConfig, source: &ConfigSource) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Show { json } => show_config(config, source, *json),
            ConfigSubcommand::Example { output, force } => generate_config(output.as_ref(), *force).await,
        }
    }
}

fn show_config(config: &DeskConfig, source: &ConfigSource, json: bool) -> Result<()> {
    let content = if json {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };

    println!("# source: {source}");
    println!("{content}");
    Ok(())
}

async fn generate_config(output: Option<&PathBuf>, force: bool) -> Result<()> {
    let example_config = ConfigLoader::generate_example_config();

    let Some(output) = output else {
        println!("{example_config}");
        return Ok(());
    };

    if output.exists() && !force {
        warn!("Configuration file already exists at: {}", output.display());
        println!("{} already exists; use --force to overwrite", output.display());
        return Ok(());
    }

    tokio::fs::write(output, example_config).await?;
    info!("Configuration file generated at: {}", output.display());
    println!("✅ Configuration file created at {}", output.display());
    Ok(())
}
