use std::time::{Duration, Instant};

/// Default minimum interval between decoded key events, in microseconds.
/// Roughly 4.5 keys per second, a comfortable human typing pace.
pub const DEFAULT_INTERVAL_US: u64 = 218_182;

/// Rate gate for decoded key events.
///
/// The source can deliver an entire script instantly; the pacer makes the
/// keyboard type it out at human speed instead. A poll inside the minimum
/// interval redelivers the previous report (a sustained key-down), a poll
/// beyond it admits one fresh decode. Callers pass the current instant in,
/// which keeps the gate deterministic under test.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True if enough time has passed to admit a new decode.
    pub fn ready(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        }
    }

    /// Record that a decode was admitted at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(Duration::from_micros(DEFAULT_INTERVAL_US))
    }
}
