use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TYPING_DOTS: &[&str] = &["·  ", "·· ", "···", " ··", "  ·", "   "];
const TICK: Duration = Duration::from_millis(120);

/// Typing indicator shown while a reply is awaited.
///
/// Clears itself when dropped, so an early return never leaves it spinning.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TYPING_DOTS);

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(style);
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(TICK);

        Self { progress_bar }
    }

    /// "BuddyAI is thinking..."
    pub fn thinking() -> Self {
        Self::new("BuddyAI is thinking...")
    }

    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}
