use serde::Serialize;

use crate::ResponseReference;

// ─── Parsed line variants ────────────────────────────────────────

/// One classified log line.
///
/// `Unrecognized` covers both unknown shapes and shapes whose fields
/// failed numeric conversion; the collector counts and skips them.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Request(RequestRecord),
    Rejection(RejectionRecord),
    QueueSnapshot { occupancy: usize },
    WorkerRequest(RequestRecord),
    Unrecognized,
}

// ─── Records ─────────────────────────────────────────────────────

/// A request the server accepted and completed.
///
/// Timestamps are seconds on the experiment clock. Fields the log did
/// not carry stay `None` — absence is a state of its own, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    pub id: u64,
    pub sent: Option<f64>,
    /// Nominal service length the client asked for
    pub length: Option<f64>,
    pub receipt: f64,
    /// When service actually began, after any queueing delay
    pub start: Option<f64>,
    pub completion: f64,
    /// Worker that serviced the request (multi-worker logs only)
    pub worker: Option<u64>,
    /// Operation label, e.g. an image-transform opcode
    pub operation: Option<String>,
    /// Trailing (performance-counter name, count) pairs
    pub counters: Vec<(String, u64)>,
}

impl RequestRecord {
    /// When the request entered the system.
    pub fn arrival(&self) -> f64 {
        self.sent.unwrap_or(self.receipt)
    }

    /// When service began; receipt stands in when the log has no start.
    pub fn service_start(&self) -> f64 {
        self.start.unwrap_or(self.receipt)
    }

    /// Measured service time.
    pub fn busy_time(&self) -> f64 {
        self.completion - self.service_start()
    }

    pub fn response_time(&self, reference: ResponseReference) -> f64 {
        match reference {
            ResponseReference::Sent => self.completion - self.arrival(),
            ResponseReference::Receipt => self.completion - self.receipt,
        }
    }
}

/// A request the server declined to admit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RejectionRecord {
    pub id: u64,
    pub sent: f64,
    pub length: f64,
    pub receipt: f64,
    pub rejected: f64,
}

/// Queue occupancy stamped with the completion event that preceded the
/// snapshot in file order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueSample {
    pub timestamp: f64,
    pub occupancy: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RequestRecord {
        RequestRecord {
            id: 7,
            sent: Some(1.0),
            length: Some(0.5),
            receipt: 1.2,
            start: Some(1.5),
            completion: 2.0,
            worker: None,
            operation: None,
            counters: Vec::new(),
        }
    }

    #[test]
    fn derived_timestamps_use_present_fields() {
        let r = record();
        assert_eq!(r.arrival(), 1.0);
        assert_eq!(r.service_start(), 1.5);
        assert!((r.busy_time() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn absent_fields_fall_back_to_receipt() {
        let r = RequestRecord {
            sent: None,
            start: None,
            ..record()
        };
        assert_eq!(r.arrival(), 1.2);
        assert_eq!(r.service_start(), 1.2);
        assert!((r.busy_time() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn response_time_honors_the_reference() {
        let r = record();
        assert!((r.response_time(ResponseReference::Sent) - 1.0).abs() < 1e-12);
        assert!(
            (r.response_time(ResponseReference::Receipt) - 0.8).abs() < 1e-12
        );
    }
}
