//! Timer engine implementation.
//!
//! The engine is a two-phase countdown. It does not use internal threads
//! or read the clock: the caller feeds it elapsed whole seconds through
//! `tick()` / `advance()`, typically from a [`Ticker`](super::Ticker), and
//! passes `now` to every command for the emitted event's timestamp.
//!
//! ## State Transitions
//!
//! ```text
//! Focus(running) --expiry/skip--> Break(stopped) --start--> Break(running)
//!       ^                                                        |
//!       +------------------ expiry/skip (stopped) ---------------+
//! ```
//!
//! Every completion stops the countdown; the next phase waits for `start()`.

use chrono::{DateTime, Utc};

use super::phase::{Durations, Phase};
use crate::error::ValidationError;
use crate::events::Event;

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    durations: Durations,
    phase: Phase,
    /// Remaining whole seconds in the current phase.
    remaining_secs: u64,
    running: bool,
}

impl TimerEngine {
    /// Create an engine at the start of a stopped focus phase.
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            phase: Phase::Focus,
            remaining_secs: durations.focus_secs,
            running: false,
        }
    }

    /// Rebuild an engine from saved state.
    pub fn restore(durations: Durations, phase: Phase, remaining_secs: u64, running: bool) -> Self {
        Self {
            durations,
            phase,
            remaining_secs,
            running,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Configured length of the current phase.
    pub fn total_secs(&self) -> u64 {
        self.durations.for_phase(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    ///
    /// Clamped, since a duration change mid-phase can leave more time
    /// remaining than the new configured length.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            progress_pct: self.progress() * 100.0,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown. No-op when already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(phase = %self.phase, remaining = self.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: now,
        })
    }

    /// Halt the countdown, keeping the remaining time. No-op when stopped.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(phase = %self.phase, remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: now,
        })
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.running {
            self.pause(now)
        } else {
            self.start(now)
        }
    }

    /// One second elapsed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.advance(1, now)
    }

    /// `secs` seconds elapsed.
    ///
    /// Returns `Some(Event::PhaseCompleted)` when the phase runs out. Time
    /// beyond the expiry is dropped because the next phase starts stopped.
    pub fn advance(&mut self, secs: u64, now: DateTime<Utc>) -> Option<Event> {
        if !self.running || secs == 0 {
            return None;
        }
        if secs < self.remaining_secs {
            self.remaining_secs -= secs;
            return None;
        }
        self.remaining_secs = 0;
        Some(self.complete_phase(false, now))
    }

    /// End the current phase immediately.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Event {
        self.complete_phase(true, now)
    }

    /// Back to a stopped, full-length focus phase.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Event {
        self.running = false;
        self.phase = Phase::Focus;
        self.remaining_secs = self.durations.focus_secs;
        tracing::debug!(remaining = self.remaining_secs, "timer reset");
        Event::TimerReset {
            focus_secs: self.remaining_secs,
            at: now,
        }
    }

    /// Change a phase length. The running phase keeps its remaining time
    /// until the next reset or phase switch.
    ///
    /// # Errors
    /// Returns a validation error for a zero length; the old length stays.
    pub fn set_duration(
        &mut self,
        phase: Phase,
        secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        self.durations.set(phase, secs)?;
        Ok(Event::DurationChanged {
            phase,
            secs,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self, skipped: bool, now: DateTime<Utc>) -> Event {
        let from = self.phase;
        let to = from.next();
        self.running = false;
        self.phase = to;
        self.remaining_secs = self.durations.for_phase(to);
        tracing::info!(%from, %to, skipped, "phase completed");
        Event::PhaseCompleted {
            from,
            to,
            skipped,
            next_secs: self.remaining_secs,
            at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    fn short() -> Durations {
        Durations::new(10, 3).unwrap()
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = TimerEngine::new(short());
        assert!(!engine.is_running());

        assert!(engine.start(t0()).is_some());
        assert!(engine.is_running());
        assert!(engine.start(t0()).is_none());

        engine.tick(t0());
        assert!(engine.pause(t0()).is_some());
        assert!(!engine.is_running());
        assert!(engine.pause(t0()).is_none());
        assert_eq!(engine.remaining_secs(), 9);

        assert!(engine.toggle(t0()).is_some());
        assert!(engine.is_running());
        assert_eq!(engine.remaining_secs(), 9);
    }

    #[test]
    fn ticks_are_ignored_while_stopped() {
        let mut engine = TimerEngine::new(short());
        assert!(engine.tick(t0()).is_none());
        assert!(engine.advance(100, t0()).is_none());
        assert_eq!(engine.remaining_secs(), 10);
    }

    #[test]
    fn last_focus_tick_switches_to_break() {
        let mut engine = TimerEngine::restore(short(), Phase::Focus, 1, true);
        let event = engine.tick(t0()).expect("completion");
        assert!(event.completes_cycle());
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 3);
        assert!(!engine.is_running());
    }

    #[test]
    fn break_expiry_returns_to_focus() {
        let mut engine = TimerEngine::restore(short(), Phase::Break, 3, true);
        assert!(engine.advance(2, t0()).is_none());
        let event = engine.tick(t0()).expect("completion");
        assert!(!event.completes_cycle());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 10);
    }

    #[test]
    fn advance_past_expiry_stops_at_phase_boundary() {
        let mut engine = TimerEngine::new(short());
        engine.start(t0());
        let event = engine.advance(500, t0()).expect("completion");
        match event {
            Event::PhaseCompleted {
                from,
                to,
                skipped,
                next_secs,
                at,
            } => {
                assert_eq!(from, Phase::Focus);
                assert_eq!(to, Phase::Break);
                assert!(!skipped);
                assert_eq!(next_secs, 3);
                assert_eq!(at, t0());
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(engine.remaining_secs(), 3);
    }

    #[test]
    fn skip_from_any_state() {
        let mut engine = TimerEngine::new(short());
        engine.start(t0());
        let event = engine.skip(t0());
        assert!(event.completes_cycle());
        assert_eq!(engine.phase(), Phase::Break);
        assert!(!engine.is_running());

        let event = engine.skip(t0());
        assert!(!event.completes_cycle());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 10);
    }

    #[test]
    fn reset_goes_to_full_focus() {
        let mut engine = TimerEngine::restore(short(), Phase::Break, 1, true);
        engine.reset(t0());
        assert_eq!(engine.phase(), Phase::Focus);
        assert_eq!(engine.remaining_secs(), 10);
        assert!(!engine.is_running());
    }

    #[test]
    fn duration_change_applies_on_next_switch() {
        let mut engine = TimerEngine::new(short());
        engine.start(t0());
        engine.advance(4, t0());
        engine.set_duration(Phase::Focus, 20, t0()).unwrap();
        assert_eq!(engine.remaining_secs(), 6);
        engine.reset(t0());
        assert_eq!(engine.remaining_secs(), 20);
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let mut engine = TimerEngine::new(short());
        assert!(engine.set_duration(Phase::Break, 0, t0()).is_err());
        assert_eq!(engine.durations().break_secs, 3);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut engine = TimerEngine::new(short());
        engine.start(t0());
        engine.advance(5, t0());
        match engine.snapshot(t0()) {
            Event::StateSnapshot {
                phase,
                running,
                remaining_secs,
                total_secs,
                progress_pct,
                at,
            } => {
                assert_eq!(phase, Phase::Focus);
                assert!(running);
                assert_eq!(remaining_secs, 5);
                assert_eq!(total_secs, 10);
                assert!((progress_pct - 50.0).abs() < f64::EPSILON);
                assert_eq!(at, t0());
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
