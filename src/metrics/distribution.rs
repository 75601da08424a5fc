use hdrhistogram::Histogram;
use serde::Serialize;

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range: 1 μs → 1 hour, 3 significant figures
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 3_600_000_000;
const HIST_SIGFIG: u8 = 3;

/// A bucket of the response-time distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistBucket {
    pub range_start_us: u64,
    pub range_end_us: u64,
    pub count: u64,
}

// ─── Latency distribution ────────────────────────────────────────

/// Accumulates response times into the bucketized distribution series
/// that downstream charting and fitting consumers read.
///
/// Buckets are for shape only; percentile values are computed exactly
/// elsewhere, never read off this histogram.
pub struct LatencyDistribution {
    hist: Histogram<u64>,
}

impl LatencyDistribution {
    /// Bucket boundaries (μs). Covers the simulated-server latency
    /// range from sub-millisecond service times up to a minute of
    /// queueing delay.
    const BOUNDARIES: &'static [u64] = &[
        1_000, 5_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000,
        1_000_000, 2_500_000, 5_000_000, 10_000_000, 30_000_000, 60_000_000,
    ];

    pub fn new() -> Self {
        Self {
            hist: Histogram::<u64>::new_with_bounds(
                HIST_LOW, HIST_HIGH, HIST_SIGFIG,
            )
            .expect("histogram creation"),
        }
    }

    /// Record one response time in seconds (clamped to ≥ 1 μs).
    pub fn record_secs(&mut self, secs: f64) {
        if !secs.is_finite() || secs < 0.0 {
            return;
        }
        let us = ((secs * 1e6) as u64).clamp(1, HIST_HIGH);
        let _ = self.hist.record(us);
    }

    /// Counts per bucket; empty buckets are skipped and everything past
    /// the last boundary lands in a single overflow bucket.
    pub fn buckets(&self) -> Vec<DistBucket> {
        if self.hist.len() == 0 {
            return Vec::new();
        }

        let bounds = Self::BOUNDARIES;
        let mut counts = vec![0u64; bounds.len() + 1];

        for iv in self.hist.iter_recorded() {
            let val = iv.value_iterated_to();
            let idx = bounds
                .iter()
                .position(|&boundary| val <= boundary)
                .unwrap_or(bounds.len());
            counts[idx] += iv.count_at_value();
        }

        let mut result = Vec::with_capacity(counts.len());
        let mut prev = 0u64;
        for (i, &boundary) in bounds.iter().enumerate() {
            if counts[i] > 0 {
                result.push(DistBucket {
                    range_start_us: prev,
                    range_end_us: boundary,
                    count: counts[i],
                });
            }
            prev = boundary;
        }
        if counts[bounds.len()] > 0 {
            result.push(DistBucket {
                range_start_us: *bounds.last().unwrap(),
                range_end_us: self.hist.max(),
                count: counts[bounds.len()],
            });
        }

        result
    }
}

impl Default for LatencyDistribution {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_distribution_has_no_buckets() {
        assert!(LatencyDistribution::new().buckets().is_empty());
    }

    #[test]
    fn buckets_cover_all_recorded_values() {
        let mut dist = LatencyDistribution::new();
        for secs in [0.0004, 0.0006, 0.02, 0.02, 1.5] {
            dist.record_secs(secs);
        }

        let buckets = dist.buckets();
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 5);
        // 0.4 ms and 0.6 ms share the first bucket (≤ 1 ms).
        assert_eq!(buckets[0].range_end_us, 1_000);
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn negative_and_non_finite_values_are_ignored() {
        let mut dist = LatencyDistribution::new();
        dist.record_secs(-1.0);
        dist.record_secs(f64::NAN);
        assert!(dist.buckets().is_empty());
    }

    #[test]
    fn values_past_the_last_boundary_overflow() {
        let mut dist = LatencyDistribution::new();
        dist.record_secs(120.0);
        let buckets = dist.buckets();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].range_start_us, 60_000_000);
        assert_eq!(buckets[0].count, 1);
    }
}
