use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Kinds of backend calls, by how long they usually take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressType {
    /// Plain CRUD calls (list, load, save)
    Fast,
    /// Anything that goes through the AI model: classify, generate, analyze,
    /// preview, sync
    Ai,
}

#[derive(Debug, Clone)]
pub struct ProgressConfig {
    pub spinner_chars: &'static str,
    pub tick_interval: Duration,
    pub color: &'static str,
}

impl ProgressType {
    pub fn config(self) -> ProgressConfig {
        match self {
            ProgressType::Fast => ProgressConfig {
                spinner_chars: "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏",
                tick_interval: Duration::from_millis(80),
                color: "cyan",
            },
            ProgressType::Ai => ProgressConfig {
                spinner_chars: "⠋⠙⠚⠒⠂⠂⠒⠲⠴⠦⠖⠒⠐⠐⠒⠓⠋",
                tick_interval: Duration::from_millis(150),
                color: "magenta",
            },
        }
    }

    /// Spinner on stderr; hidden automatically when stderr is not a terminal.
    pub fn create_spinner(self, message: &str) -> AdaptiveSpinner {
        let config = self.config();
        let spinner = ProgressBar::new_spinner();

        let template = format!("{{spinner:.{}}} {{msg}}", config.color);
        let progress_style = ProgressStyle::default_spinner()
            .tick_chars(config.spinner_chars)
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        spinner.set_style(progress_style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(config.tick_interval);

        AdaptiveSpinner { spinner }
    }
}

pub struct AdaptiveSpinner {
    spinner: ProgressBar,
}

impl AdaptiveSpinner {
    pub fn finish_success(&self, message: &str) {
        self.spinner
            .finish_with_message(style(format!("✓ {message}")).green().to_string());
    }

    pub fn finish_error(&self, message: &str) {
        self.spinner
            .finish_with_message(style(format!("✗ {message}")).red().to_string());
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }
}

/// Run `future` behind a spinner that is cleared when it completes.
pub async fn with_spinner<F, T>(kind: ProgressType, message: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let spinner = kind.create_spinner(message);
    let output = future.await;
    spinner.finish_and_clear();
    output
}

pub struct ProgressBuilder;

impl ProgressBuilder {
    pub fn ai(message: &str) -> AdaptiveSpinner {
        ProgressType::Ai.create_spinner(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_spinner_ticks_slower() {
        assert!(ProgressType::Ai.config().tick_interval > ProgressType::Fast.config().tick_interval);
    }

    #[tokio::test]
    async fn test_with_spinner_returns_output() {
        let value = with_spinner(ProgressType::Fast, "loading", async { 42 }).await;
        assert_eq!(value, 42);
    }
}
