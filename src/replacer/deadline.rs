//! Wall-clock bounds for regex work.
//!
//! Each job runs on its own short-lived thread and the caller waits at
//! most `budget` for the answer. A job that overruns is abandoned, not
//! killed; the regex backtrack limit bounds how long it keeps running.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Which regex operation a bound applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Match,
    Substitute,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Substitute => "substitution",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DeadlineError {
    #[error("budget of {0:?} exceeded")]
    Elapsed(Duration),
    #[error("worker thread exited without a result")]
    WorkerLost,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs closures under a fixed wall-clock budget.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run `job` and wait for it for at most the budget.
    pub fn run<T, F>(&self, stage: Stage, job: F) -> Result<T, DeadlineError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name("replacer-regex".to_string())
            .spawn(move || {
                // The receiver is gone if the caller already gave up.
                let _ = tx.send(job());
            })?;

        match rx.recv_timeout(self.budget) {
            Ok(value) => Ok(value),
            Err(RecvTimeoutError::Timeout) => {
                debug!(stage = %stage, budget = ?self.budget, "Abandoning regex worker");
                Err(DeadlineError::Elapsed(self.budget))
            }
            Err(RecvTimeoutError::Disconnected) => Err(DeadlineError::WorkerLost),
        }
    }
}
