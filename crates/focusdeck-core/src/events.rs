use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every timer state change produces an Event.
/// Front ends print them; the timer service reacts to completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ended, by running out or by being skipped.
    /// This is the completion signal front ends announce.
    PhaseCompleted {
        from: Phase,
        to: Phase,
        skipped: bool,
        next_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        focus_secs: u64,
        at: DateTime<Utc>,
    },
    DurationChanged {
        phase: Phase,
        secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for a completion that leaves a focus phase, i.e. one cycle.
    pub fn completes_cycle(&self) -> bool {
        matches!(
            self,
            Event::PhaseCompleted {
                from: Phase::Focus,
                ..
            }
        )
    }
}
