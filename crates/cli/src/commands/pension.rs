use anyhow::{bail, Context, Result};
use application::{DocumentEditor, PensionInfoEditor, PensionInfoStore};
use async_trait::async_trait;
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::context::AppContext;
use crate::progress::{with_spinner, ProgressType};
use crate::render;
use crate::session::{run_session, LineEditor};

#[derive(Debug, Args)]
pub struct PensionCommand {
    #[command(subcommand)]
    command: PensionSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum PensionSubcommand {
    /// Show the pension information and its analysis
    #[command(name = "show")]
    Show,
    /// Edit interactively; changes are auto-saved
    #[command(name = "edit")]
    Edit,
    /// Run the AI analysis on the current text and save the result
    #[command(name = "analyze")]
    Analyze,
    /// Replace the free text (from --text, --file or stdin) and save
    #[command(name = "save")]
    Save {
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl PensionCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        handle(self.command, ctx).await
    }
}

async fn open_editor(ctx: &AppContext) -> PensionInfoEditor {
    let store = PensionInfoStore::new(ctx.client.clone());
    with_spinner(
        ProgressType::Fast,
        "Loading pension information...",
        DocumentEditor::open(store, ctx.config.autosave.delay()),
    )
    .await
}

/// Strict variant for commands that write without showing the document.
async fn load_editor(ctx: &AppContext) -> Result<PensionInfoEditor> {
    let store = PensionInfoStore::new(ctx.client.clone());
    let editor = with_spinner(
        ProgressType::Fast,
        "Loading pension information...",
        DocumentEditor::load(store, ctx.config.autosave.delay()),
    )
    .await?;
    Ok(editor)
}

async fn handle(cmd: PensionSubcommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        PensionSubcommand::Show => {
            let stored = ctx.client.pension_info().await?;
            println!("{}", render::pension_info(&stored.content, stored.updated_at));
        }
        PensionSubcommand::Edit => {
            let editor = open_editor(ctx).await;
            run_session(editor, ctx).await?;
        }
        PensionSubcommand::Analyze => {
            let mut editor = load_editor(ctx).await?;
            with_spinner(ProgressType::Ai, "Analyzing...", editor.analyze()).await?;
            editor.save_now().await?;
            println!("{}", render::pension_info(&editor.content(), editor.last_saved_at()));
            editor.close();
        }
        PensionSubcommand::Save { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => {
                    let mut buffer = String::new();
                    tokio::io::stdin()
                        .read_to_string(&mut buffer)
                        .await
                        .context("Failed to read text from stdin")?;
                    buffer
                }
            };

            let mut editor = load_editor(ctx).await?;
            editor.set_raw_text(text);
            editor.save_now().await?;
            println!("{} {}", style("✓").green(), render::last_saved(editor.last_saved_at()));
            editor.close();
        }
    }
    Ok(())
}

/// Parse `:set` values as JSON where possible so numbers and booleans keep
/// their type; anything else is stored as text.
fn parse_field_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[async_trait]
impl LineEditor for PensionInfoEditor {
    fn title(&self) -> &'static str {
        "pension information"
    }

    fn help(&self) -> &'static str {
        "Each line is appended to the text. :clear empties it, :set <path> <value> edits \
         the analysis (e.g. :set basic_info.name RPA펜션), :analyze runs the AI analysis"
    }

    fn render(&self) -> String {
        render::pension_info(&self.content(), self.last_saved_at())
    }

    async fn apply(&mut self, line: &str, _ctx: &AppContext) -> Result<Option<String>> {
        let trimmed = line.trim();

        if trimmed == ":clear" {
            self.set_raw_text(String::new());
            return Ok(Some("Text cleared".to_string()));
        }

        if trimmed == ":analyze" {
            with_spinner(ProgressType::Ai, "Analyzing...", self.analyze()).await?;
            return Ok(Some(self.render()));
        }

        if let Some(rest) = trimmed.strip_prefix(":set ") {
            let (path, raw) = rest
                .trim()
                .split_once(char::is_whitespace)
                .context("usage: :set <path> <value>")?;
            self.set_analyzed_field(path, parse_field_value(raw.trim()))?;
            return Ok(None);
        }

        if trimmed.starts_with(':') {
            bail!("unknown command '{trimmed}'");
        }

        let line = line.to_string();
        self.edit(|info| {
            if !info.raw_text.is_empty() && !info.raw_text.ends_with('\n') {
                info.raw_text.push('\n');
            }
            info.raw_text.push_str(&line);
        });
        Ok(None)
    }
}
