use anyhow::{bail, Context, Result};
use application::{DocumentEditor, ResponseSettingsEditor, ResponseSettingsStore};
use async_trait::async_trait;
use clap::{Args, Subcommand};
use console::style;
use domain::ResponseSettings;

use crate::context::AppContext;
use crate::progress::{with_spinner, ProgressType};
use crate::render;
use crate::session::{run_session, LineEditor};

#[derive(Debug, Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SettingsSubcommand {
    /// Show the reply style settings
    #[command(name = "show")]
    Show,
    /// Change one or more settings and save, e.g. `set tone=formal include_emoji=false`
    #[command(name = "set")]
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
    /// Render a sample reply; --set overrides are previewed, not saved
    #[command(name = "preview")]
    Preview {
        /// Guest question to answer (defaults to preview.sample_query)
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Edit interactively; changes are auto-saved
    #[command(name = "edit")]
    Edit,
}

impl SettingsCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        handle(self.command, ctx).await
    }
}

async fn open_editor(ctx: &AppContext) -> ResponseSettingsEditor {
    let store = ResponseSettingsStore::new(ctx.client.clone());
    with_spinner(
        ProgressType::Fast,
        "Loading response settings...",
        DocumentEditor::open(store, ctx.config.autosave.delay()),
    )
    .await
}

/// Strict variant for commands that write without showing the document.
async fn load_editor(ctx: &AppContext) -> Result<ResponseSettingsEditor> {
    let store = ResponseSettingsStore::new(ctx.client.clone());
    let editor = with_spinner(
        ProgressType::Fast,
        "Loading response settings...",
        DocumentEditor::load(store, ctx.config.autosave.delay()),
    )
    .await?;
    Ok(editor)
}

/// Split `key=value` (or `key = value`).
fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("expected KEY=VALUE, got '{raw}'");
    }
    Ok((key, value.trim()))
}

async fn handle(cmd: SettingsSubcommand, ctx: &AppContext) -> Result<()> {
    match cmd {
        SettingsSubcommand::Show => {
            let stored = ctx.client.response_settings().await?;
            println!("{}", render::response_settings(&stored.content, stored.updated_at));
        }
        SettingsSubcommand::Set { assignments } => {
            let parsed = assignments
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<Result<Vec<_>>>()?;

            let mut editor = load_editor(ctx).await?;
            for (key, value) in parsed {
                editor.set_field(key, value)?;
            }
            editor.save_now().await?;
            println!("{}", render::response_settings(&editor.content(), editor.last_saved_at()));
            editor.close();
        }
        SettingsSubcommand::Preview { query, overrides } => {
            let mut editor = open_editor(ctx).await;
            for raw in &overrides {
                let (key, value) = parse_assignment(raw)?;
                editor.set_field(key, value)?;
            }

            let query = query.unwrap_or_else(|| ctx.config.preview.sample_query.clone());
            let preview = with_spinner(ProgressType::Ai, "Rendering preview...", editor.preview(&query)).await?;
            // Overrides were only for this preview.
            editor.close();

            println!("{} {query}", style("Q:").bold());
            println!("{preview}");
        }
        SettingsSubcommand::Edit => {
            let editor = open_editor(ctx).await;
            run_session(editor, ctx).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl LineEditor for ResponseSettingsEditor {
    fn title(&self) -> &'static str {
        "response settings"
    }

    fn help(&self) -> &'static str {
        "Type `key = value` to change a setting, :preview [question] renders a sample reply \
         with the current settings"
    }

    fn render(&self) -> String {
        render::response_settings(&self.content(), self.last_saved_at())
    }

    async fn apply(&mut self, line: &str, ctx: &AppContext) -> Result<Option<String>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if let Some(rest) = trimmed.strip_prefix(":preview") {
            let query = match rest.trim() {
                "" => ctx.config.preview.sample_query.clone(),
                custom => custom.to_string(),
            };
            let preview = with_spinner(ProgressType::Ai, "Rendering preview...", self.preview(&query)).await?;
            return Ok(Some(preview));
        }

        if trimmed.starts_with(':') {
            bail!("unknown command '{trimmed}'");
        }

        let (key, value) = parse_assignment(trimmed).with_context(|| {
            format!("settings are: {}", ResponseSettings::FIELDS.join(", "))
        })?;
        self.set_field(key, value)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment_trims_both_sides() {
        assert_eq!(parse_assignment("tone = formal").unwrap(), ("tone", "formal"));
        assert_eq!(parse_assignment("greeting=안녕하세요=)").unwrap(), ("greeting", "안녕하세요=)"));
        assert!(parse_assignment("tone").is_err());
        assert!(parse_assignment("=formal").is_err());
    }
}
