use anyhow::{Context, Result};
use application::{Inbox, ReplyComposer};
use clap::{Args, Subcommand};
use console::style;
use domain::EmailFilter;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use crate::context::AppContext;
use crate::progress::{with_spinner, ProgressBuilder, ProgressType};
use crate::render;

#[derive(Debug, Args)]
pub struct EmailsCommand {
    #[command(subcommand)]
    command: EmailsSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum EmailsSubcommand {
    /// List emails with per-filter counts
    #[command(name = "list", alias = "ls")]
    List {
        /// all, unread, urgent, read, replied or archived
        #[arg(short, long, default_value = "all")]
        filter: String,
        /// Maximum number of emails to fetch (defaults to inbox.default_limit)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show an email; unread mail is marked read
    #[command(name = "show")]
    Show { id: String },
    /// Classify an email with the AI model
    #[command(name = "classify")]
    Classify { id: String },
    /// Archive an email
    #[command(name = "archive")]
    Archive { id: String },
    /// Generate a reply draft with the AI model; the draft is printed, not sent
    #[command(name = "reply")]
    Reply {
        id: String,
        /// Ask for a reply without the pension signature
        #[arg(long)]
        no_signature: bool,
    },
    /// Send a reply written by hand (from --message, --file or stdin)
    #[command(name = "send")]
    Send {
        id: String,
        #[arg(short, long, conflicts_with = "file")]
        message: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

impl EmailsCommand {
    pub async fn execute(self, ctx: &AppContext) -> Result<()> {
        handle(self.command, ctx).await
    }
}

async fn handle(cmd: EmailsSubcommand, ctx: &AppContext) -> Result<()> {
    let limit = ctx.config.inbox.default_limit;

    match cmd {
        EmailsSubcommand::List { filter, limit: requested } => {
            let filter: EmailFilter = filter.parse()?;
            let mut inbox = Inbox::new(ctx.client.clone(), requested.unwrap_or(limit));
            with_spinner(ProgressType::Fast, "Loading emails...", inbox.refresh()).await;
            inbox.set_filter(filter);

            println!("{}", render::filter_header(&inbox.filter_counts(), inbox.filter()));
            let visible = inbox.visible();
            if visible.is_empty() {
                println!("{}", style("No emails").dim());
            }
            for email in visible {
                println!("{}", render::email_row(email));
            }
        }
        EmailsSubcommand::Show { id } => {
            let mut inbox = Inbox::new(ctx.client.clone(), limit);
            let email = inbox.open(&id).await?;
            println!("{}", render::email_detail(&email));
        }
        EmailsSubcommand::Classify { id } => {
            let mut inbox = Inbox::new(ctx.client.clone(), limit);
            let classification =
                with_spinner(ProgressType::Ai, "Classifying...", inbox.classify(&id)).await?;

            println!(
                "{} priority: {}",
                style("✓").green(),
                render::priority_badge(Some(&classification.priority))
            );
            if !classification.tags.is_empty() {
                println!("  tags: {}", classification.tags.join(", "));
            }
            if let Some(confidence) = classification.confidence {
                println!("  confidence: {:.0}%", confidence * 100.0);
            }
        }
        EmailsSubcommand::Archive { id } => {
            let mut inbox = Inbox::new(ctx.client.clone(), limit);
            inbox.archive(&id).await?;
            println!("{} Email {id} archived", style("✓").green());
        }
        EmailsSubcommand::Reply { id, no_signature } => {
            let include_signature = ctx.config.reply.include_signature && !no_signature;
            let mut composer = ReplyComposer::new(ctx.client.clone(), id.as_str(), include_signature);

            let spinner = ProgressBuilder::ai("Generating reply...");
            match composer.generate().await {
                Ok(_) => spinner.finish_success("Reply generated"),
                Err(e) => {
                    spinner.finish_error("Reply generation failed");
                    return Err(e.into());
                }
            }

            println!("{}", composer.draft());
            println!(
                "{}",
                style(format!("Not sent. Review the draft, then use `emails send {id}`.")).dim()
            );
        }
        EmailsSubcommand::Send { id, message, file } => {
            let content = match (message, file) {
                (Some(message), _) => message,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => read_stdin().await?,
            };

            let mut composer = ReplyComposer::new(ctx.client.clone(), id.as_str(), false);
            composer.set_draft(content);
            let response = composer.send().await?;

            let message = if response.message.is_empty() {
                "Reply sent".to_string()
            } else {
                response.message
            };
            println!("{} {message}", style("✓").green());
        }
    }
    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    tokio::io::stdin()
        .read_to_string(&mut content)
        .await
        .context("Failed to read reply from stdin")?;
    Ok(content)
}
