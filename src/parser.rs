use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

use crate::record::{ParsedLine, RejectionRecord, RequestRecord};

// ─── Line shapes ─────────────────────────────────────────────────
// Tried in order, most specific first; the first match wins.

/// `T<wid> R<id>:<sent>,<op>,<overwrite>,<client>,<server>,<receipt>,<start>,<completion>`
/// with an optional trailing `,<event>,<count>` performance-counter pair.
static WORKER_REQUEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^T(\d+) R(\d+):([\d.]+),(\w+),(\d+),(\d+),(\d+),([\d.]+),([\d.]+),([\d.]+)(?:,(\w+),(\d+))?$",
    )
    .expect("worker request pattern")
});

/// `R<id>:<sent>,<length>,<receipt>,<start>,<completion>`
static REQUEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^R(\d+):([\d.]+),([\d.]+),([\d.]+),([\d.]+),([\d.]+)$")
        .expect("request pattern")
});

/// `X<id>:<sent>,<length>,<receipt>,<reject>`
static REJECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^X(\d+):([\d.]+),([\d.]+),([\d.]+),([\d.]+)$")
        .expect("rejection pattern")
});

/// `Q:[id,id,...]` — possibly empty.
static QUEUE_SNAPSHOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Q:\[([^\]]*)\]$").expect("queue pattern"));

// ─── Entry point ─────────────────────────────────────────────────

/// Classify one log line.
///
/// Stateless; surrounding whitespace is tolerated. A line matching no
/// shape, or one whose captured field fails numeric conversion, yields
/// [`ParsedLine::Unrecognized`] after a single diagnostic — the parser
/// never panics and never aborts the stream. Whitespace-only lines are
/// `Unrecognized` without a diagnostic.
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Unrecognized;
    }

    if let Some(caps) = WORKER_REQUEST.captures(line) {
        return worker_request(&caps).unwrap_or_else(|| malformed(line));
    }
    if let Some(caps) = REQUEST.captures(line) {
        return request(&caps).unwrap_or_else(|| malformed(line));
    }
    if let Some(caps) = REJECTION.captures(line) {
        return rejection(&caps).unwrap_or_else(|| malformed(line));
    }
    if let Some(caps) = QUEUE_SNAPSHOT.captures(line) {
        return queue_snapshot(&caps);
    }

    warn!(line, "line matches no known shape, skipping");
    ParsedLine::Unrecognized
}

fn malformed(line: &str) -> ParsedLine {
    warn!(line, "field failed numeric conversion, skipping");
    ParsedLine::Unrecognized
}

// ─── Per-shape extraction ────────────────────────────────────────
// Each returns None when a captured field does not convert; the caller
// turns that into a diagnostic.

fn worker_request(caps: &Captures) -> Option<ParsedLine> {
    let worker = caps[1].parse().ok()?;
    let id = caps[2].parse().ok()?;
    let sent: f64 = caps[3].parse().ok()?;
    let operation = caps[4].to_owned();
    // Overwrite flag and the two image identifiers are validated as
    // integers but carry no metric information.
    let _: u64 = caps[5].parse().ok()?;
    let _: u64 = caps[6].parse().ok()?;
    let _: u64 = caps[7].parse().ok()?;
    let receipt = caps[8].parse().ok()?;
    let start: f64 = caps[9].parse().ok()?;
    let completion = caps[10].parse().ok()?;

    let mut counters = Vec::new();
    if let (Some(name), Some(count)) = (caps.get(11), caps.get(12)) {
        counters
            .push((name.as_str().to_owned(), count.as_str().parse().ok()?));
    }

    Some(ParsedLine::WorkerRequest(RequestRecord {
        id,
        sent: Some(sent),
        length: None,
        receipt,
        start: Some(start),
        completion,
        worker: Some(worker),
        operation: Some(operation),
        counters,
    }))
}

fn request(caps: &Captures) -> Option<ParsedLine> {
    Some(ParsedLine::Request(RequestRecord {
        id: caps[1].parse().ok()?,
        sent: Some(caps[2].parse().ok()?),
        length: Some(caps[3].parse().ok()?),
        receipt: caps[4].parse().ok()?,
        start: Some(caps[5].parse().ok()?),
        completion: caps[6].parse().ok()?,
        worker: None,
        operation: None,
        counters: Vec::new(),
    }))
}

fn rejection(caps: &Captures) -> Option<ParsedLine> {
    Some(ParsedLine::Rejection(RejectionRecord {
        id: caps[1].parse().ok()?,
        sent: caps[2].parse().ok()?,
        length: caps[3].parse().ok()?,
        receipt: caps[4].parse().ok()?,
        rejected: caps[5].parse().ok()?,
    }))
}

fn queue_snapshot(caps: &Captures) -> ParsedLine {
    let inner = caps[1].trim();
    let occupancy = if inner.is_empty() {
        0
    } else {
        inner.split(',').count()
    };
    ParsedLine::QueueSnapshot { occupancy }
}
