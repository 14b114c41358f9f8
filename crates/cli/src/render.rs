//! Plain-text rendering of backend records.
//!
//! Functions return strings so the command handlers decide where output
//! goes and tests can check it without a terminal.

use application::SaveStatus;
use chrono::{DateTime, Local, Utc};
use console::style;
use domain::{Email, EmailFilter, EmailStats, EmailStatus, PensionInfo, Priority, ResponseSettings};
use std::fmt::Write;

pub fn status_badge(status: &EmailStatus) -> String {
    let text = status.as_str().to_string();
    match status {
        EmailStatus::Unread => style(text).bold().blue().to_string(),
        EmailStatus::Replied => style(text).green().to_string(),
        EmailStatus::Archived => style(text).dim().to_string(),
        _ => text,
    }
}

pub fn priority_badge(priority: Option<&Priority>) -> String {
    match priority {
        Some(Priority::Urgent) => style("urgent").red().bold().to_string(),
        Some(Priority::Spam) => style("spam").dim().to_string(),
        Some(other) => other.as_str().to_string(),
        None => style("unclassified").dim().to_string(),
    }
}

pub fn filter_header(counts: &[(EmailFilter, usize)], active: &EmailFilter) -> String {
    counts
        .iter()
        .map(|(filter, count)| {
            let label = format!("{} ({count})", filter.label());
            if filter == active {
                style(format!("[{label}]")).bold().to_string()
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn email_row(email: &Email) -> String {
    format!(
        "{:<10} {:<8} {:<14} {:<24} {}",
        email.id,
        status_badge(&email.status),
        priority_badge(email.priority.as_ref()),
        truncate(email.sender(), 24),
        email.subject
    )
}

pub fn email_detail(email: &Email) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(&email.subject).bold());
    let _ = writeln!(out, "From:     {} <{}>", email.sender(), email.sender_email);
    let _ = writeln!(out, "Received: {}", email.received_at);
    let _ = writeln!(
        out,
        "Status:   {}   Priority: {}",
        status_badge(&email.status),
        priority_badge(email.priority.as_ref())
    );
    if !email.tags.is_empty() {
        let _ = writeln!(out, "Tags:     {}", email.tags.join(", "));
    }
    let _ = writeln!(out);
    out.push_str(&email.body);
    out
}

pub fn stats(stats: &EmailStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total:    {}", stats.total);
    let _ = writeln!(out, "Unread:   {}", stats.unread);
    let _ = writeln!(out, "Replied:  {}", stats.replied);
    let _ = writeln!(out, "Archived: {}", stats.archived);
    if let Some(recent) = stats.recent {
        let _ = writeln!(out, "Last 24h: {recent}");
    }
    if let Some(avg) = stats.avg_response_time {
        let _ = writeln!(out, "Avg response time: {avg:.1}h");
    }
    if !stats.priority_distribution.is_empty() {
        let mut priorities: Vec<_> = stats.priority_distribution.iter().collect();
        priorities.sort();
        let line = priorities
            .iter()
            .map(|(name, count)| format!("{name}={count}"))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "Priorities: {line}");
    }
    out
}

pub fn pension_info(info: &PensionInfo, saved_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("Pension information").bold());
    if info.is_blank() {
        let _ = writeln!(out, "{}", style("(empty)").dim());
    } else {
        let _ = writeln!(out, "{}", info.raw_text.trim_end());
    }

    if let Some(analyzed) = &info.analyzed_info {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("Analysis").bold());
        let pretty = serde_json::to_string_pretty(analyzed).unwrap_or_else(|_| analyzed.to_string());
        let _ = writeln!(out, "{pretty}");
    }

    let _ = writeln!(out);
    out.push_str(&last_saved(saved_at));
    out
}

pub fn response_settings(settings: &ResponseSettings, saved_at: Option<DateTime<Utc>>) -> String {
    let mut out = String::new();
    let rows = [
        ("greeting", settings.greeting.clone()),
        ("closing", settings.closing.clone()),
        ("tone", settings.tone.to_string()),
        ("structure", settings.structure.to_string()),
        ("custom_instructions", settings.custom_instructions.clone()),
        ("response_length", settings.response_length.to_string()),
        ("include_emoji", settings.include_emoji.to_string()),
        ("personal_touch", settings.personal_touch.to_string()),
    ];
    for (key, value) in rows {
        let _ = writeln!(out, "{:<20} {}", style(key).cyan(), value);
    }
    let _ = writeln!(out);
    out.push_str(&last_saved(saved_at));
    out
}

pub fn last_saved(saved_at: Option<DateTime<Utc>>) -> String {
    match saved_at {
        Some(at) => format!("Last saved: {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")),
        None => "Last saved: never".to_string(),
    }
}

/// One-line summary for the status line of an editing session.
pub fn save_status(status: &SaveStatus) -> String {
    let mut parts = vec![last_saved(status.last_saved_at)];
    if status.pending {
        parts.push("changes pending".to_string());
    }
    if status.in_flight > 0 {
        parts.push("saving...".to_string());
    }
    if let Some(error) = &status.last_error {
        parts.push(style(format!("last auto-save failed: {error}")).yellow().to_string());
    }
    parts.join(" | ")
}

/// Failure text for the user: backend and validation errors collapse to
/// their single-line message, anything else keeps its context chain.
pub fn error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<common::DeskError>() {
        Some(desk) => desk.user_message(),
        None => format!("{err:#}"),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
