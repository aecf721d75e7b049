//! CLI-specific progress handling for saferoute
//!
//! A spinner on stderr while backend requests are in flight.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner for CLI display
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress manager for one request phase
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    pub fn new(message: &str) -> Self {
        Self {
            pb: create_spinner(message),
        }
    }

    /// Hidden spinner, used when output is piped as JSON
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_with_message(message.to_string());
    }

    pub fn fail(&self, message: &str) {
        self.pb.abandon_with_message(message.to_string());
    }
}
