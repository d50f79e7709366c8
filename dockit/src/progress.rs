//! Terminal progress bars for uploads.

use dockit_core::contract::ProgressObserver;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "Uploading {msg} [{bar:40.cyan/blue}] {percent}% | {bytes}/{total_bytes}";

/// One bar per file, driven by acknowledged bytes.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(label: &str) -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .map(|style| style.progress_chars("█▓░"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(0).with_style(style);
        bar.set_message(label.to_string());
        Self { bar }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_start(&self, total_bytes: u64) {
        self.bar.set_length(total_bytes);
        self.bar.set_position(0);
    }

    fn on_progress(&self, bytes_transferred: u64) {
        self.bar.set_position(bytes_transferred);
    }

    fn on_finish(&self) {
        self.bar.finish();
    }
}

impl Drop for ProgressBarObserver {
    fn drop(&mut self) {
        // Leaves the last drawn state on screen if the upload failed midway.
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
