use serde::Serialize;

use crate::error::MetricsError;

/// Summary statistics for one response-time collection.
/// Serialized straight into the run report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseTimeSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Arithmetic mean. Empty input is undefined, not `0.0`.
pub fn mean(values: &[f64]) -> Result<f64, MetricsError> {
    if values.is_empty() {
        return Err(MetricsError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile `q` in `[0, 1]` by linear interpolation between the two
/// nearest ranks of the sorted sequence (rank = `q · (n−1)`,
/// zero-indexed). The single percentile rule in this crate; summaries
/// and reports both go through here.
pub fn percentile(values: &[f64], q: f64) -> Result<f64, MetricsError> {
    if values.is_empty() {
        return Err(MetricsError::EmptyInput);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(rank_interpolate(&sorted, q))
}

/// Full summary over a finite in-memory collection.
pub fn summarize(values: &[f64]) -> Result<ResponseTimeSummary, MetricsError> {
    if values.is_empty() {
        return Err(MetricsError::EmptyInput);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(ResponseTimeSummary {
        count: sorted.len() as u64,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
        p50: rank_interpolate(&sorted, 0.50),
        p95: rank_interpolate(&sorted, 0.95),
        p99: rank_interpolate(&sorted, 0.99),
    })
}

// Assumes `sorted` is non-empty and ascending.
fn rank_interpolate(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
