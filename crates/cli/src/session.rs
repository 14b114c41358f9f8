//! Line-oriented editing sessions.
//!
//! A session is the terminal counterpart of an open editor page: every line
//! typed is an edit, auto-save runs in the background with the configured
//! quiet period, and leaving the session discards a save that has not fired.

use anyhow::{Context, Result};
use application::{DocumentEditor, RemoteStore, SaveStatus};
use async_trait::async_trait;
use chrono::Local;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::AppContext;
use crate::render;

/// Document-specific part of a session: how a typed line changes the
/// document and how the document is shown.
#[async_trait]
pub trait LineEditor: Send {
    fn title(&self) -> &'static str;

    fn help(&self) -> &'static str;

    fn render(&self) -> String;

    /// Apply one line of input. Returns a message to print, if any.
    async fn apply(&mut self, line: &str, ctx: &AppContext) -> Result<Option<String>>;
}

#[derive(Debug, PartialEq, Eq)]
enum SessionInput<'a> {
    Save,
    Quit,
    Status,
    Show,
    Help,
    Edit(&'a str),
}

fn parse_input(line: &str) -> SessionInput<'_> {
    match line.trim() {
        ":save" | ":w" => SessionInput::Save,
        ":quit" | ":q" => SessionInput::Quit,
        ":status" => SessionInput::Status,
        ":show" => SessionInput::Show,
        ":help" | ":h" => SessionInput::Help,
        _ => SessionInput::Edit(line),
    }
}

const COMMON_HELP: &str = ":save writes now, :status shows save state, :show prints the document, :quit leaves";

pub async fn run_session<S>(mut editor: DocumentEditor<S>, ctx: &AppContext) -> Result<()>
where
    S: RemoteStore,
    DocumentEditor<S>: LineEditor,
{
    println!("{}", style(format!("Editing {}", editor.title())).bold());
    println!("{}", style(editor.help()).dim());
    println!("{}", style(COMMON_HELP).dim());
    println!();
    println!("{}", editor.render());

    let mut status = editor.subscribe();
    let mut seen = status.borrow_and_update().clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match parse_input(&line) {
                    SessionInput::Quit => break,
                    SessionInput::Save => {
                        match editor.save_now().await {
                            Ok(at) => println!(
                                "{} Saved at {}",
                                style("✓").green(),
                                at.with_timezone(&Local).format("%H:%M:%S")
                            ),
                            Err(e) => eprintln!("{} {}", style("✗").red(), e.user_message()),
                        }
                        seen = status.borrow_and_update().clone();
                    }
                    SessionInput::Status => println!("{}", render::save_status(&editor.status())),
                    SessionInput::Show => println!("{}", editor.render()),
                    SessionInput::Help => {
                        println!("{}", editor.help());
                        println!("{COMMON_HELP}");
                    }
                    SessionInput::Edit(line) => match editor.apply(line, ctx).await {
                        Ok(Some(message)) => println!("{message}"),
                        Ok(None) => {}
                        Err(e) => eprintln!("{} {}", style("✗").red(), render::error(&e)),
                    },
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                report_background_save(&seen, &current);
                seen = current;
            }
        }
    }

    if editor.has_pending_save() {
        println!(
            "{}",
            style("Leaving with an auto-save still pending; those changes were not saved.").yellow()
        );
    }
    editor.close();
    Ok(())
}

fn report_background_save(before: &SaveStatus, after: &SaveStatus) {
    if after.completed_writes > before.completed_writes {
        println!("{}", style(render::last_saved(after.last_saved_at)).dim());
    }
    if after.failed_writes > before.failed_writes {
        let error = after.last_error.as_deref().unwrap_or("unknown error");
        eprintln!("{} Auto-save failed: {error}", style("⚠").yellow());
    }
}
