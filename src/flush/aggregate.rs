use crate::error::FlushError;
use crate::progress::ProgressReporter;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

pub const CLOSING_LINES: [&str; 3] = [
    "Sorting completed!",
    "Lines have been sorted into directories by first letter and files by first two letters.",
    "Duplicates removed and entries sorted alphabetically.",
];

/// What happened to one bucket.
#[derive(Debug)]
pub enum Outcome {
    Written { path: PathBuf, count: usize },
    Failed { path: PathBuf, error: FlushError },
}

impl Outcome {
    /// Target shard file of the bucket, whether or not it was written.
    pub fn path(&self) -> &PathBuf {
        match self {
            Outcome::Written { path, .. } | Outcome::Failed { path, .. } => path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Written { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Written { path, count } => {
                write!(f, "Processed {}: {} unique entries", path.display(), count)
            }
            Outcome::Failed { error, .. } => write!(f, "{}", error),
        }
    }
}

/// Collects one outcome per bucket from the workers.
pub struct Aggregator {
    expected: usize,
    outcomes: Vec<Outcome>,
}

impl Aggregator {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            outcomes: Vec::with_capacity(expected),
        }
    }

    /// Drain `rx` until every expected outcome arrived or all senders hung up.
    pub fn collect(mut self, rx: &Receiver<Outcome>, reporter: &dyn ProgressReporter) -> Summary {
        while self.outcomes.len() < self.expected {
            match rx.recv() {
                Ok(outcome) => {
                    self.outcomes.push(outcome);
                    reporter.on_flush_progress(self.outcomes.len(), self.expected);
                }
                Err(_) => break,
            }
        }
        Summary::new(self.outcomes)
    }
}

/// Final report of a flush phase. Rendering is independent of the order in
/// which the workers finished.
#[derive(Debug)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn new(mut outcomes: Vec<Outcome>) -> Self {
        outcomes.sort_by(|a, b| a.path().cmp(b.path()));
        Self { outcomes }
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    pub fn lines_written(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                Outcome::Written { count, .. } => *count,
                Outcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        for line in CLOSING_LINES {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
