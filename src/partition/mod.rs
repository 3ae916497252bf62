mod classifier;
mod ingest;
mod store;

pub use classifier::{classify, BucketKey};
pub use ingest::{ingest_lines, IngestStats, PROGRESS_INTERVAL};
pub use store::{Bucket, BucketStore, Insert, WorkItem};
