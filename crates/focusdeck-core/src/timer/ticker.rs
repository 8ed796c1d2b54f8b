//! Monotonic one-second tick source.
//!
//! Sleeping for "one second" in a loop drifts: wakeups arrive late and the
//! error accumulates. The ticker instead measures elapsed time against a
//! monotonic anchor and hands out whole seconds, carrying the fractional
//! remainder forward. Stopping discards the partial second, so no tick is
//! delivered after a pause until the ticker is started again.

use std::time::{Duration, Instant};

const ONE_SECOND: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Default)]
pub struct Ticker {
    anchor: Option<Instant>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start counting from `now`. Restarting an active ticker re-anchors it.
    pub fn start_at(&mut self, now: Instant) {
        self.anchor = Some(now);
    }

    pub fn stop(&mut self) {
        self.anchor = None;
    }

    /// Whole seconds elapsed since the last poll.
    pub fn poll(&mut self) -> u64 {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> u64 {
        let Some(anchor) = self.anchor else {
            return 0;
        };
        let whole = now.saturating_duration_since(anchor).as_secs();
        if whole > 0 {
            self.anchor = Some(anchor + Duration::from_secs(whole));
        }
        whole
    }

    /// Time until the next whole second is due, or `None` when stopped.
    pub fn until_next_at(&self, now: Instant) -> Option<Duration> {
        let anchor = self.anchor?;
        let elapsed = now.saturating_duration_since(anchor);
        let into_second = Duration::from_nanos(u64::from(elapsed.subsec_nanos()));
        Some(ONE_SECOND - into_second)
    }

    pub fn until_next(&self) -> Option<Duration> {
        self.until_next_at(Instant::now())
    }
}
