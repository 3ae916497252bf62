mod aggregate;
mod pool;
mod writer;

pub use aggregate::{Aggregator, Outcome, Summary, CLOSING_LINES};
pub use pool::{build_pool, flush_work_items};
pub use writer::persist;
