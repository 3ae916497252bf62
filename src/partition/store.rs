use super::classifier::{classify, BucketKey};
use crate::config::ShardConfig;
use ahash::{AHashMap, AHashSet};
use std::path::{Component, Path, PathBuf};

/// Unique lines sharing one bucket key.
#[derive(Debug)]
pub struct Bucket {
    pub key: BucketKey,
    pub lines: AHashSet<String>,
}

impl Bucket {
    fn new(key: BucketKey) -> Self {
        Self {
            key,
            lines: AHashSet::new(),
        }
    }
}

/// Result of offering one raw line to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Blank,
    Added,
    Duplicate,
}

/// Write-once table of buckets built by the ingestion phase.
///
/// Owned by a single thread while it grows. It is consumed by value into
/// buckets or work items before the flush phase, so nothing here is shared.
#[derive(Debug, Default)]
pub struct BucketStore {
    buckets: AHashMap<BucketKey, Bucket>,
    line_count: usize,
}

impl BucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, raw: &str) -> Insert {
        let line = raw.trim();
        if line.is_empty() {
            return Insert::Blank;
        }

        let key = classify(line);
        let bucket = self
            .buckets
            .entry(key)
            .or_insert_with_key(|key| Bucket::new(key.clone()));

        // Probe first so duplicates don't allocate.
        if bucket.lines.contains(line) {
            return Insert::Duplicate;
        }
        bucket.lines.insert(line.to_string());
        self.line_count += 1;
        Insert::Added
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Distinct lines across all buckets.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    /// Final snapshot of every bucket, in no particular order.
    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets.into_iter().map(|(_, bucket)| bucket).collect()
    }

    /// Consume the store into one work item per output file, rooted at `root`.
    ///
    /// Keys made of separators or dots can resolve to the same file once
    /// cleaned (`"./"` and `"//"` both land on `root/.txt`); such buckets are
    /// merged so no two workers ever write the same path.
    pub fn into_work_items(self, root: &Path, config: &ShardConfig) -> Vec<WorkItem> {
        let mut by_path: AHashMap<PathBuf, (PathBuf, AHashSet<String>)> = AHashMap::new();
        for bucket in self.into_buckets() {
            let (dir_path, file_path) = resolve_paths(&bucket.key, root, config);
            by_path
                .entry(file_path)
                .or_insert_with(|| (dir_path, AHashSet::new()))
                .1
                .extend(bucket.lines);
        }

        by_path
            .into_iter()
            .map(|(file_path, (dir_path, lines))| WorkItem {
                dir_path,
                file_path,
                lines: lines.into_iter().collect(),
            })
            .collect()
    }
}

/// Join `piece` onto `base` keeping only its plain name components, so root,
/// `.` and `..` parts can never move the result outside `base`.
fn join_within(base: &Path, piece: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in Path::new(piece).components() {
        if let Component::Normal(name) = component {
            path.push(name);
        }
    }
    path
}

fn resolve_paths(key: &BucketKey, root: &Path, config: &ShardConfig) -> (PathBuf, PathBuf) {
    let dir_path = join_within(root, &key.directory);
    let file_path = join_within(&dir_path, &config.file_name(&key.stem));
    // A stem such as `a/` nests the file one level below the directory.
    let dir_path = file_path
        .parent()
        .filter(|parent| parent.starts_with(&dir_path))
        .map(Path::to_path_buf)
        .unwrap_or(dir_path);
    (dir_path, file_path)
}

/// One output file handed to the worker pool together with its lines.
#[derive(Debug)]
pub struct WorkItem {
    pub dir_path: PathBuf,
    pub file_path: PathBuf,
    pub lines: Vec<String>,
}
