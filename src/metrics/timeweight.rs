use tracing::warn;

use crate::record::QueueSample;

/// Result of time-weighted aggregation over an ordered sample series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWeightedAverage {
    pub average: f64,
    /// Intervals dropped because consecutive samples ran backwards in time
    pub skipped_intervals: u64,
}

/// Averages queue occupancy weighted by how long each sample persisted.
///
/// Sample `i` is weighted by `t[i+1] − t[i]`; the final sample reuses
/// the previous interval's duration as the best estimate of its own
/// persistence. Samples arrive in file order, so a negative interval
/// means the log's clock ran backwards — that interval is dropped from
/// both numerator and denominator, with a diagnostic.
///
/// Fewer than two samples, or a zero total duration, yield `0.0`.
pub fn time_weighted_average(samples: &[QueueSample]) -> TimeWeightedAverage {
    let mut weighted_sum = 0.0;
    let mut total_duration = 0.0;
    let mut skipped = 0u64;

    for (i, sample) in samples.iter().enumerate() {
        let duration = if i + 1 < samples.len() {
            samples[i + 1].timestamp - sample.timestamp
        } else if samples.len() >= 2 {
            // Final sample: reuse the previous inter-sample spacing.
            sample.timestamp - samples[i - 1].timestamp
        } else {
            0.0
        };

        if duration < 0.0 {
            warn!(
                at = sample.timestamp,
                duration, "negative sample interval, skipping"
            );
            skipped += 1;
            continue;
        }

        weighted_sum += duration * sample.occupancy as f64;
        total_duration += duration;
    }

    let average = if total_duration > 0.0 {
        weighted_sum / total_duration
    } else {
        0.0
    };
    TimeWeightedAverage {
        average,
        skipped_intervals: skipped,
    }
}
