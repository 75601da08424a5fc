use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::metrics::distribution::DistBucket;
use crate::metrics::ewma::CategoryError;
use crate::metrics::percentiles::ResponseTimeSummary;
use crate::record::QueueSample;

// ─── Line counters ───────────────────────────────────────────────

/// How many lines of each shape a run saw. `unrecognized` doubles as
/// the diagnostics count: one warn was emitted per unrecognized line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineCounts {
    pub total: u64,
    pub requests: u64,
    pub worker_requests: u64,
    pub rejections: u64,
    pub queue_snapshots: u64,
    pub unrecognized: u64,
}

/// Admission statistics for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RejectionStats {
    pub accepted: u64,
    pub rejected: u64,
    /// `rejected / (accepted + rejected)`; `0.0` when nothing was observed
    pub ratio: f64,
}

// ─── Run report ──────────────────────────────────────────────────

/// Everything one run produces: scalar metrics plus the derived series
/// downstream exporters and chart consumers read.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Log file the run analyzed, when it came from disk
    pub source: Option<String>,
    pub generated_at: DateTime<Utc>,

    pub lines: LineCounts,

    // Scalar metrics
    pub utilization: f64,
    pub avg_queue_length: f64,
    /// Queue-sample intervals dropped for running backwards in time
    pub skipped_intervals: u64,
    /// `None` when the run had no accepted requests — an undefined
    /// summary, not a zero one
    pub response_time: Option<ResponseTimeSummary>,
    pub rejections: RejectionStats,
    pub category_errors: BTreeMap<String, CategoryError>,

    // Derived series
    pub distribution: Vec<DistBucket>,
    pub response_times: Vec<f64>,
    pub inter_arrival_times: Vec<f64>,
    pub inter_rejection_times: Vec<f64>,
    pub queue_samples: Vec<QueueSample>,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One summary row per run, matching [`csv_header`]. Undefined
    /// response-time summaries leave their cells empty.
    pub fn csv_row(&self) -> String {
        let (mean, p99) = match &self.response_time {
            Some(summary) => (
                format!("{:.6}", summary.mean),
                format!("{:.6}", summary.p99),
            ),
            None => (String::new(), String::new()),
        };
        format!(
            "{},{:.6},{:.6},{},{},{:.6},{},{}",
            self.source.as_deref().unwrap_or(""),
            self.utilization,
            self.avg_queue_length,
            mean,
            p99,
            self.rejections.ratio,
            self.rejections.accepted,
            self.rejections.rejected,
        )
    }
}

/// Column header for sweep summary tables.
pub fn csv_header() -> &'static str {
    "source,utilization,avg_queue_length,mean_response_time,\
     p99_response_time,rejection_ratio,accepted,rejected"
}
