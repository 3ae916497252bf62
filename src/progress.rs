/// Trait for reporting sharding progress.
///
/// The CLI implements it with indicatif bars; tests use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_ingest_start(&self) {}
    fn on_ingest_progress(&self, _lines_read: u64) {}
    fn on_ingest_complete(&self, _lines_read: u64, _buckets: usize, _duration_secs: f64) {}
    fn on_flush_start(&self, _buckets: usize, _workers: usize) {}
    fn on_flush_progress(&self, _buckets_done: usize, _total_buckets: usize) {}
    fn on_flush_complete(&self, _written: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
