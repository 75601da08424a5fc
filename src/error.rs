use std::path::PathBuf;

use thiserror::Error;

/// Metric-level failures.
///
/// Only summaries over empty collections are errors; every line- and
/// sample-level problem is recovered inside the engine and surfaced as
/// a diagnostic plus a counter, never as `Err`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// Mean/percentile over an empty collection is undefined and must
    /// be signaled, not reported as `0.0`.
    #[error("cannot summarize an empty collection")]
    EmptyInput,
}

/// Per-run failures. A failed run never aborts the rest of a sweep.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
