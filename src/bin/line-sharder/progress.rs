use indicatif::{ProgressBar, ProgressStyle};
use line_sharder::ProgressReporter;
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars on stderr.
///
/// - Ingest phase: spinner (line count unknown upfront)
/// - Flush phase: progress bar over buckets
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_ingest_start(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message("Reading input...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_ingest_progress(&self, lines_read: u64) {
        self.with_bar(|pb| pb.set_message(format!("Reading input... {} lines", lines_read)));
    }

    fn on_ingest_complete(&self, lines_read: u64, buckets: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Read complete: {} lines into {} buckets in {:.2}s",
            lines_read, buckets, duration_secs
        );
    }

    fn on_flush_start(&self, buckets: usize, _workers: usize) {
        let pb = ProgressBar::new(buckets as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Writing [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars(TICK_CHARS));
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_flush_progress(&self, buckets_done: usize, _total_buckets: usize) {
        self.with_bar(|pb| pb.set_position(buckets_done as u64));
    }

    fn on_flush_complete(&self, written: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Write complete: {} files, {} failed in {:.2}s",
            written, failed, duration_secs
        );
    }
}
