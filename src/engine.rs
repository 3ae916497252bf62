use crate::config::{self, ShardConfig};
use crate::error::Error;
use crate::flush::{self, Summary};
use crate::partition::{self, BucketStore, IngestStats};
use crate::progress::ProgressReporter;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct ShardEngine {
    config: ShardConfig,
}

#[derive(Debug)]
pub struct ShardResult {
    pub root: PathBuf,
    pub workers: usize,
    pub ingest_duration: Duration,
    pub flush_duration: Duration,
    pub ingest_stats: IngestStats,
    pub summary: Summary,
}

impl ShardEngine {
    pub fn new(config: ShardConfig) -> Self {
        Self { config }
    }

    pub fn worker_count(&self) -> usize {
        self.config.worker_count()
    }

    /// Directory that will hold the shard tree for `input`.
    pub fn root_dir(&self, input: &Path) -> Result<PathBuf, Error> {
        let name =
            config::root_name(input).ok_or_else(|| Error::InvalidInput(input.to_path_buf()))?;
        Ok(match &self.config.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        })
    }

    /// Read the whole input into a bucket store.
    ///
    /// Any read failure aborts: a partially read input would undercount
    /// later buckets, so nothing is returned to flush.
    pub fn ingest(
        &self,
        input: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<(BucketStore, IngestStats), Error> {
        let file = File::open(input).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::InputNotFound(input.to_path_buf()),
            _ => Error::Open {
                path: input.to_path_buf(),
                source,
            },
        })?;

        reporter.on_ingest_start();
        let start = Instant::now();
        let mut store = BucketStore::new();
        let stats = partition::ingest_lines(BufReader::new(file), &mut store, reporter).map_err(
            |source| Error::Read {
                path: input.to_path_buf(),
                source,
            },
        )?;
        let duration = start.elapsed();
        reporter.on_ingest_complete(stats.lines_read, stats.buckets, duration.as_secs_f64());

        debug!(
            "Ingest completed in {:.2}s: {} lines, {} blank, {} duplicates, {} distinct in {} buckets",
            duration.as_secs_f64(),
            stats.lines_read,
            stats.blank_lines,
            stats.duplicate_lines,
            stats.distinct_lines,
            stats.buckets,
        );
        Ok((store, stats))
    }

    /// Sort and persist every bucket under `root` on a dedicated worker pool.
    pub fn flush(
        &self,
        store: BucketStore,
        root: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<Summary, Error> {
        let workers = self.worker_count();
        let pool = flush::build_pool(workers)?;

        let items = store.into_work_items(root, &self.config);
        reporter.on_flush_start(items.len(), workers);
        let start = Instant::now();
        let summary = flush::flush_work_items(&pool, items, reporter);
        let duration = start.elapsed();
        reporter.on_flush_complete(summary.written(), summary.failed(), duration.as_secs_f64());

        debug!(
            "Flush completed in {:.2}s: {} written, {} failed, {} lines",
            duration.as_secs_f64(),
            summary.written(),
            summary.failed(),
            summary.lines_written(),
        );
        Ok(summary)
    }

    /// Run the full pipeline:
    /// 1. Single-threaded ingestion into the bucket store
    /// 2. Parallel sort and write of every bucket
    pub fn run(&self, input: &Path, reporter: &dyn ProgressReporter) -> Result<ShardResult, Error> {
        let root = self.root_dir(input)?;
        info!("Sharding {} into {}", input.display(), root.display());

        let ingest_start = Instant::now();
        let (store, ingest_stats) = self.ingest(input, reporter)?;
        let ingest_duration = ingest_start.elapsed();

        info!("Writing {} buckets...", store.bucket_count());
        let flush_start = Instant::now();
        let summary = self.flush(store, &root, reporter)?;
        let flush_duration = flush_start.elapsed();

        Ok(ShardResult {
            root,
            workers: self.worker_count(),
            ingest_duration,
            flush_duration,
            ingest_stats,
            summary,
        })
    }
}
