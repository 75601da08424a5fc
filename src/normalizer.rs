use crate::record::QueueSample;

/// Pairs completion events with the queue snapshot that follows them.
///
/// The server prints queue occupancy on the line after a completion, so
/// the two are only meaningful together. Exactly one piece of state is
/// carried: the completion timestamp still waiting for its snapshot.
///
/// Two completions with no snapshot in between keep only the later
/// timestamp — a deliberate simplification matching the log's own
/// convention, not something to silently work around. A snapshot with
/// nothing pending is dropped.
#[derive(Debug, Default)]
pub struct SnapshotPairer {
    pending: Option<f64>,
}

impl SnapshotPairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a completion event; any unconsumed previous one is replaced.
    pub fn on_completion(&mut self, completion: f64) {
        self.pending = Some(completion);
    }

    /// Consume a queue snapshot, yielding a sample when one is pending.
    pub fn on_snapshot(&mut self, occupancy: usize) -> Option<QueueSample> {
        self.pending.take().map(|timestamp| QueueSample {
            timestamp,
            occupancy,
        })
    }
}
