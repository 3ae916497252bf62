pub mod config;
pub mod engine;
pub mod error;
pub mod flush;
pub mod partition;
pub mod progress;

pub use self::config::ShardConfig;
pub use engine::{ShardEngine, ShardResult};
pub use error::Error;
pub use flush::{Outcome, Summary};
pub use partition::{classify, BucketKey, BucketStore, IngestStats};
pub use progress::{ProgressReporter, SilentReporter};
