use super::store::{BucketStore, Insert};
use crate::progress::ProgressReporter;
use std::borrow::Cow;
use std::io::{self, BufRead};

/// Lines between two `on_ingest_progress` calls.
pub const PROGRESS_INTERVAL: u64 = 10_000;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestStats {
    pub lines_read: u64,
    pub blank_lines: u64,
    pub duplicate_lines: u64,
    /// Lines that were not valid UTF-8 and were kept with replacement characters.
    pub lossy_lines: u64,
    pub distinct_lines: usize,
    pub buckets: usize,
}

/// Feed every line of `reader` into `store`.
///
/// Lines are split on `\n` as raw bytes; invalid UTF-8 is decoded lossily
/// rather than rejected. Stops at end of stream. An I/O error is returned
/// as-is and the caller must treat the store as incomplete.
pub fn ingest_lines<R: BufRead>(
    mut reader: R,
    store: &mut BucketStore,
    reporter: &dyn ProgressReporter,
) -> io::Result<IngestStats> {
    let mut stats = IngestStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        stats.lines_read += 1;

        let line = String::from_utf8_lossy(strip_newline(&buf));
        if let Cow::Owned(_) = line {
            stats.lossy_lines += 1;
        }

        match store.ingest(&line) {
            Insert::Blank => stats.blank_lines += 1,
            Insert::Duplicate => stats.duplicate_lines += 1,
            Insert::Added => {}
        }

        if stats.lines_read % PROGRESS_INTERVAL == 0 {
            reporter.on_ingest_progress(stats.lines_read);
        }
    }

    stats.distinct_lines = store.line_count();
    stats.buckets = store.bucket_count();
    Ok(stats)
}

fn strip_newline(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}
