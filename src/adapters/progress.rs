use crate::ports::ProgressPort;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner with a running count; the total is unknown while the walk is
/// still in flight.
pub struct ProgressBarAdapter {
    bar: ProgressBar,
    quiet: bool,
}

impl ProgressBarAdapter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner:.cyan} {pos} files hashed {msg}")
        {
            bar.set_style(style);
        }
        Self { bar, quiet: false }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        if quiet {
            self.bar = ProgressBar::hidden();
        }
        self
    }
}

impl Default for ProgressBarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for ProgressBarAdapter {
    fn start(&self) {
        if self.quiet {
            return;
        }

        self.bar.set_message("Hashing files...");
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn update(&self, processed: u64) {
        if self.quiet {
            return;
        }

        self.bar.set_position(processed);
    }

    fn finish(&self) {
        if self.quiet {
            return;
        }

        self.bar.disable_steady_tick();
        self.bar.finish_with_message("✓ Scan complete!");
    }
}

/// For library callers that want no progress output.
pub struct NoProgress;

impl ProgressPort for NoProgress {
    fn start(&self) {}
    fn update(&self, _processed: u64) {}
    fn finish(&self) {}
}
