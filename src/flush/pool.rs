use super::aggregate::{Aggregator, Outcome, Summary};
use super::writer::persist;
use crate::error::FlushError;
use crate::partition::WorkItem;
use crate::progress::ProgressReporter;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use tracing::error;

pub fn build_pool(workers: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("shard-worker-{}", i))
        .build()
}

/// Persist every work item on `pool` and gather the outcomes.
///
/// Items are split one per task so each worker takes a single bucket at a
/// time. The calling thread acts as the aggregator while the pool drains
/// the queue; it returns once every bucket has been attempted.
pub fn flush_work_items(
    pool: &ThreadPool,
    items: Vec<WorkItem>,
    reporter: &dyn ProgressReporter,
) -> Summary {
    flush_with(pool, items, reporter, persist)
}

fn flush_with<F>(
    pool: &ThreadPool,
    items: Vec<WorkItem>,
    reporter: &dyn ProgressReporter,
    write: F,
) -> Summary
where
    F: Fn(WorkItem) -> Outcome + Send + Sync,
{
    let aggregator = Aggregator::new(items.len());
    let (tx, rx) = mpsc::channel();
    let write = &write;

    pool.in_place_scope(|scope| {
        scope.spawn(move |_| {
            items
                .into_par_iter()
                .with_max_len(1)
                .for_each_with(tx, |tx, item| {
                    // The aggregator outlives the scope, so a send can't fail.
                    let _ = tx.send(write_isolated(write, item));
                });
        });
        aggregator.collect(&rx, reporter)
    })
}

/// Run `write` on one bucket, turning a panic into a failed outcome so the
/// rest of the pool is unaffected.
fn write_isolated<F>(write: &F, item: WorkItem) -> Outcome
where
    F: Fn(WorkItem) -> Outcome,
{
    let path = item.file_path.clone();
    panic::catch_unwind(AssertUnwindSafe(|| write(item))).unwrap_or_else(|payload| {
        let error = FlushError::Panicked {
            path: path.clone(),
            message: panic_message(payload.as_ref()),
        };
        error!("{}", error);
        Outcome::Failed { path, error }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
