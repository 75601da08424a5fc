use chrono::Utc;
use uuid::Uuid;

use crate::metrics::distribution::LatencyDistribution;
use crate::metrics::ewma::ServiceTimePredictor;
use crate::metrics::percentiles;
use crate::metrics::timeweight;
use crate::normalizer::SnapshotPairer;
use crate::parser;
use crate::record::{ParsedLine, QueueSample, RejectionRecord, RequestRecord};
use crate::report::{LineCounts, RejectionStats, RunReport};
use crate::RunConfig;

// ─── Run collector ───────────────────────────────────────────────

/// Single-run metrics engine.
///
/// Feed it raw lines in file order, then call [`finish`] for the
/// report. One collector owns everything a run accumulates — pairing
/// state, per-operation estimators, series — so independent runs can
/// proceed concurrently without any coordination.
///
/// [`finish`]: RunCollector::finish
pub struct RunCollector {
    config: RunConfig,
    pairer: SnapshotPairer,
    predictor: ServiceTimePredictor,
    distribution: LatencyDistribution,

    // Line counters
    counts: LineCounts,

    // Utilization accumulators
    busy_sum: f64,
    earliest_arrival: Option<f64>,
    latest_completion: Option<f64>,

    // Series, in file order
    response_times: Vec<f64>,
    arrival_times: Vec<f64>,
    rejection_times: Vec<f64>,
    queue_samples: Vec<QueueSample>,
}

impl RunCollector {
    pub fn new(config: RunConfig) -> Self {
        let predictor = ServiceTimePredictor::new(config.ewma_alpha);
        Self {
            config,
            pairer: SnapshotPairer::new(),
            predictor,
            distribution: LatencyDistribution::new(),
            counts: LineCounts::default(),
            busy_sum: 0.0,
            earliest_arrival: None,
            latest_completion: None,
            response_times: Vec::new(),
            arrival_times: Vec::new(),
            rejection_times: Vec::new(),
            queue_samples: Vec::new(),
        }
    }

    /// Classify and consume one raw log line. Blank lines are ignored.
    pub fn consume_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        self.counts.total += 1;

        match parser::parse_line(line) {
            ParsedLine::Request(record) => {
                self.counts.requests += 1;
                self.consume_request(record);
            }
            ParsedLine::WorkerRequest(record) => {
                self.counts.worker_requests += 1;
                self.consume_request(record);
            }
            ParsedLine::Rejection(record) => {
                self.counts.rejections += 1;
                self.consume_rejection(record);
            }
            ParsedLine::QueueSnapshot { occupancy } => {
                self.counts.queue_snapshots += 1;
                if let Some(sample) = self.pairer.on_snapshot(occupancy) {
                    self.queue_samples.push(sample);
                }
            }
            ParsedLine::Unrecognized => {
                self.counts.unrecognized += 1;
            }
        }
    }

    fn consume_request(&mut self, record: RequestRecord) {
        let arrival = record.arrival();
        self.note_arrival(arrival);
        self.arrival_times.push(arrival);

        self.latest_completion = Some(match self.latest_completion {
            Some(t) => t.max(record.completion),
            None => record.completion,
        });
        self.busy_sum += record.busy_time();

        let response = record.response_time(self.config.reference);
        self.response_times.push(response);
        self.distribution.record_secs(response);

        if let Some(operation) = record.operation.as_deref() {
            self.predictor.observe(operation, record.busy_time());
        }

        self.pairer.on_completion(record.completion);
    }

    fn consume_rejection(&mut self, record: RejectionRecord) {
        // A rejected request still arrived; it widens the window but
        // contributes no busy time.
        self.note_arrival(record.sent);
        self.rejection_times.push(record.rejected);
    }

    fn note_arrival(&mut self, arrival: f64) {
        self.earliest_arrival = Some(match self.earliest_arrival {
            Some(t) => t.min(arrival),
            None => arrival,
        });
    }

    /// `Σ busy / (window × workers)`; `0.0` whenever the window or the
    /// capacity is not positive — never a division by zero.
    fn utilization(&self) -> f64 {
        let (Some(first), Some(last)) =
            (self.earliest_arrival, self.latest_completion)
        else {
            return 0.0;
        };
        let capacity = (last - first) * f64::from(self.config.worker_count);
        if capacity <= 0.0 {
            return 0.0;
        }
        self.busy_sum / capacity
    }

    /// Compute every metric and hand back the report. Consumes the
    /// collector: a run's state never outlives the run.
    pub fn finish(self, source: Option<String>) -> RunReport {
        let utilization = self.utilization();
        let weighted = timeweight::time_weighted_average(&self.queue_samples);
        let response_time = percentiles::summarize(&self.response_times).ok();

        let accepted = self.counts.requests + self.counts.worker_requests;
        let rejected = self.counts.rejections;
        let observed = accepted + rejected;
        let ratio = if observed > 0 {
            rejected as f64 / observed as f64
        } else {
            0.0
        };

        RunReport {
            run_id: Uuid::new_v4(),
            source,
            generated_at: Utc::now(),
            lines: self.counts,
            utilization,
            avg_queue_length: weighted.average,
            skipped_intervals: weighted.skipped_intervals,
            response_time,
            rejections: RejectionStats {
                accepted,
                rejected,
                ratio,
            },
            category_errors: self.predictor.report(),
            distribution: self.distribution.buckets(),
            inter_arrival_times: inter_event_times(self.arrival_times),
            inter_rejection_times: inter_event_times(self.rejection_times),
            response_times: self.response_times,
            queue_samples: self.queue_samples,
        }
    }
}

/// Successive differences of a timestamp series, sorted ascending
/// first; empty below two events.
fn inter_event_times(mut times: Vec<f64>) -> Vec<f64> {
    if times.len() < 2 {
        return Vec::new();
    }
    times.sort_by(|a, b| a.total_cmp(b));
    times.windows(2).map(|w| w[1] - w[0]).collect()
}
