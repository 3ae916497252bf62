use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run before the flush phase starts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("File '{}' not found!", .0.display())]
    InputNotFound(PathBuf),

    #[error("Error opening file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Error reading file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Cannot derive an output directory name from '{}'", .0.display())]
    InvalidInput(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failure to persist a single bucket. Recorded in its outcome, never raised.
#[derive(Error, Debug)]
pub enum FlushError {
    #[error("Error creating directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Error creating file {}: {source}", .path.display())]
    CreateFile { path: PathBuf, source: io::Error },

    #[error("Error writing file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Error writing file {}: worker panicked: {message}", .path.display())]
    Panicked { path: PathBuf, message: String },
}
