use anyhow::Result;
use application::Inbox;
use console::style;

use crate::context::AppContext;
use crate::progress::{with_spinner, ProgressType};
use crate::render;

/// `pension-desk stats`
pub async fn stats(ctx: &AppContext) -> Result<()> {
    let stats = with_spinner(ProgressType::Fast, "Loading stats...", ctx.client.stats()).await?;
    print!("{}", render::stats(&stats));
    Ok(())
}

/// `pension-desk sync`: fetch new mail on the backend, then show the
/// refreshed dashboard counts.
pub async fn sync(ctx: &AppContext) -> Result<()> {
    let mut inbox = Inbox::new(ctx.client.clone(), ctx.config.inbox.default_limit);
    let outcome = with_spinner(ProgressType::Ai, "Syncing mailbox...", inbox.sync()).await?;

    let message = if outcome.message.is_empty() {
        format!("Sync completed. {} new emails processed.", outcome.processed_count)
    } else {
        outcome.message
    };
    println!("{} {message}", style("✓").green());
    println!("{}", render::filter_header(&inbox.filter_counts(), inbox.filter()));
    Ok(())
}
