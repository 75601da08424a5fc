//! Parsing and metrics engine for the event logs of a simulated
//! request-queueing server.
//!
//! A run ingests one log file line by line, reconstructs the implicit
//! pairing between completion events and queue-occupancy snapshots, and
//! computes utilization, time-weighted average queue length,
//! response-time summaries, rejection statistics and a per-operation
//! service-time predictor. Chart rendering, curve fitting and CLI
//! plumbing all live downstream, consuming [`RunReport`].

pub mod error;
pub mod metrics;
pub mod normalizer;
pub mod parser;
pub mod record;
pub mod report;
pub mod runner;

pub use error::{MetricsError, RunError};
pub use metrics::collector::RunCollector;
pub use record::{ParsedLine, QueueSample, RejectionRecord, RequestRecord};
pub use report::RunReport;
pub use runner::{analyze_file, analyze_lines, analyze_sweep, SweepOutcome};

use serde::{Deserialize, Serialize};

// ─── Run configuration ───────────────────────────────────────────

/// Which timestamp a response time is measured from.
///
/// Both definitions occur across call sites: `Sent` is the
/// client-visible latency, counting from the moment the request left
/// the client; `Receipt` starts the clock when the server admitted it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResponseReference {
    #[default]
    Sent,
    Receipt,
}

/// Per-run knobs. Loadable straight from JSON; every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Reference timestamp for response times
    #[serde(default)]
    pub reference: ResponseReference,

    /// Number of server workers; scales the capacity utilization is
    /// measured against
    #[serde(default = "default_worker_count")]
    pub worker_count: u32,

    /// Smoothing constant for the per-operation service-time estimator
    #[serde(default = "default_ewma_alpha")]
    pub ewma_alpha: f64,
}

fn default_worker_count() -> u32 {
    1
}
fn default_ewma_alpha() -> f64 {
    0.7
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reference: ResponseReference::default(),
            worker_count: default_worker_count(),
            ewma_alpha: default_ewma_alpha(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_from_empty_json() {
        let config: RunConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.reference, ResponseReference::Sent);
        assert_eq!(config.worker_count, 1);
        assert!((config.ewma_alpha - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn config_reads_receipt_reference() {
        let config: RunConfig =
            serde_json::from_str(r#"{"reference":"receipt","worker_count":2}"#)
                .unwrap();
        assert_eq!(config.reference, ResponseReference::Receipt);
        assert_eq!(config.worker_count, 2);
    }
}
