//! The focus timer bound to storage and a clock.
//!
//! [`TimerEngine`] only knows about phases and seconds. `FocusTimer` adds
//! the persisted parts: configured durations, today's cycle counter and,
//! for front ends that exit between commands, the live session.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::cycles::DailyCycles;
use super::engine::TimerEngine;
use super::phase::{parse_duration, Durations, Phase};
use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::storage::{Storage, StorageExt};

/// Record key for the `{ focus, break }` lengths.
pub const DURATIONS_KEY: &str = "timerDurations";
/// Record key for `{ date, cycles }`.
pub const CYCLES_KEY: &str = "pomodoroStats";
/// Record key for the live countdown shared between CLI invocations.
pub const SESSION_KEY: &str = "timerSession";

/// Live countdown state as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSession {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub running: bool,
    /// Wall-clock instant the remaining value was measured at.
    pub saved_at: DateTime<Utc>,
}

/// Result of [`FocusTimer::refresh_session`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSync {
    /// The stored session is the one this timer last read or wrote.
    Unchanged,
    /// Another writer replaced the session and it has been adopted.
    /// `completed` holds the phase completion caught up on the way.
    Adopted { completed: Option<Event> },
}

pub struct FocusTimer<'a> {
    store: &'a dyn Storage,
    clock: &'a dyn Clock,
    engine: TimerEngine,
    cycles: DailyCycles,
    /// Sub-second remainder of wall-clock time already applied on restore.
    carried_ms: i64,
    /// Session as last read from or written to storage.
    last_session: Option<TimerSession>,
}

impl<'a> FocusTimer<'a> {
    /// Load durations and the cycle counter, rolling the counter over if
    /// it belongs to an earlier day. Unreadable records fall back to
    /// `defaults` and a fresh counter.
    pub fn load(store: &'a dyn Storage, clock: &'a dyn Clock, defaults: Durations) -> Self {
        let mut durations: Durations = store.load_or(DURATIONS_KEY, defaults);
        if !durations.is_valid() {
            tracing::warn!(?durations, "stored durations are invalid, using defaults");
            durations = defaults;
        }

        let today = clock.today();
        let mut cycles: DailyCycles = store.load_or(CYCLES_KEY, DailyCycles::new(today));
        if cycles.rollover(today) {
            if let Err(e) = store.save(CYCLES_KEY, &cycles) {
                tracing::warn!(error = %e, "failed to persist cycle counter rollover");
            }
        }

        Self {
            store,
            clock,
            engine: TimerEngine::new(durations),
            cycles,
            carried_ms: 0,
            last_session: None,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn durations(&self) -> Durations {
        self.engine.durations()
    }

    /// Focus phases completed today.
    ///
    /// Applies the day rollover first, so a counter left over from
    /// yesterday reads as zero.
    pub fn cycles_today(&mut self) -> Result<u32> {
        let today = self.clock.today();
        if self.cycles.rollover(today) {
            self.store.save(CYCLES_KEY, &self.cycles)?;
        }
        Ok(self.cycles.on(today))
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.clock.now())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.engine.start(self.clock.now())
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause(self.clock.now())
    }

    pub fn toggle(&mut self) -> Option<Event> {
        self.engine.toggle(self.clock.now())
    }

    pub fn tick(&mut self) -> Result<Option<Event>> {
        self.advance(1)
    }

    pub fn advance(&mut self, secs: u64) -> Result<Option<Event>> {
        let event = self.engine.advance(secs, self.clock.now());
        if let Some(ref e) = event {
            self.on_completion(e, self.clock.today())?;
        }
        Ok(event)
    }

    pub fn skip(&mut self) -> Result<Event> {
        let event = self.engine.skip(self.clock.now());
        self.on_completion(&event, self.clock.today())?;
        Ok(event)
    }

    pub fn reset(&mut self) -> Event {
        self.carried_ms = 0;
        self.engine.reset(self.clock.now())
    }

    /// Change and persist a phase length.
    pub fn set_duration(&mut self, phase: Phase, secs: u64) -> Result<Event> {
        let event = self.engine.set_duration(phase, secs, self.clock.now())?;
        self.store.save(DURATIONS_KEY, &self.engine.durations())?;
        Ok(event)
    }

    /// [`FocusTimer::set_duration`] from raw user input.
    pub fn set_duration_input(&mut self, phase: Phase, input: &str) -> Result<Event> {
        let secs = parse_duration(phase, input)?;
        self.set_duration(phase, secs)
    }

    // ── Session persistence ──────────────────────────────────────────

    /// Resume the countdown saved by a previous process.
    ///
    /// A running session is advanced by the wall-clock time since it was
    /// saved; if that crosses the phase end the completion is applied
    /// (and returned) exactly as a live tick would, dated at the moment
    /// the phase ran out.
    pub fn restore_session(&mut self) -> Result<Option<Event>> {
        let session = self.store.load_or::<Option<TimerSession>>(SESSION_KEY, None);
        self.last_session = session.clone();
        match session {
            Some(session) => self.apply_session(session),
            None => Ok(None),
        }
    }

    /// Re-read the stored session and adopt it if another writer has
    /// replaced it since this timer last read or wrote it.
    ///
    /// Read failures (a concurrent writer holding the lock, a record that
    /// does not parse) count as unchanged.
    pub fn refresh_session(&mut self) -> Result<SessionSync> {
        let raw = match self.store.get_raw(SESSION_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to re-read timer session");
                return Ok(SessionSync::Unchanged);
            }
        };
        let stored = raw.and_then(|r| serde_json::from_str::<Option<TimerSession>>(&r).ok());
        let Some(session) = stored.flatten() else {
            return Ok(SessionSync::Unchanged);
        };
        if self.last_session.as_ref() == Some(&session) {
            return Ok(SessionSync::Unchanged);
        }

        tracing::debug!(
            phase = %session.phase,
            running = session.running,
            remaining = session.remaining_secs,
            "adopting timer session written elsewhere"
        );
        self.last_session = Some(session.clone());
        let completed = self.apply_session(session)?;
        Ok(SessionSync::Adopted { completed })
    }

    /// Save the live countdown for [`FocusTimer::restore_session`].
    pub fn save_session(&mut self) -> Result<()> {
        let mut saved_at = self.clock.now();
        if self.engine.is_running() {
            saved_at -= Duration::milliseconds(self.carried_ms);
        }
        let session = TimerSession {
            phase: self.engine.phase(),
            remaining_secs: self.engine.remaining_secs(),
            running: self.engine.is_running(),
            saved_at,
        };
        self.store.save(SESSION_KEY, &Some(&session))?;
        self.last_session = Some(session);
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_session(&mut self, session: TimerSession) -> Result<Option<Event>> {
        let durations = self.engine.durations();
        let remaining = if session.remaining_secs == 0 {
            durations.for_phase(session.phase)
        } else {
            session.remaining_secs
        };
        self.engine = TimerEngine::restore(durations, session.phase, remaining, session.running);
        self.carried_ms = 0;
        if !session.running {
            return Ok(None);
        }

        let now = self.clock.now();
        let elapsed_ms = (now - session.saved_at).num_milliseconds().max(0);
        let expired_at = i64::try_from(remaining)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|d| session.saved_at.checked_add_signed(d))
            .map_or(now, |at| at.min(now));

        let Some(event) = self.engine.advance((elapsed_ms / 1000) as u64, expired_at) else {
            self.carried_ms = elapsed_ms % 1000;
            return Ok(None);
        };
        self.on_completion(&event, self.clock.date_of(expired_at))?;
        Ok(Some(event))
    }

    fn on_completion(&mut self, event: &Event, day: NaiveDate) -> Result<()> {
        if !event.completes_cycle() {
            return Ok(());
        }
        // Another process may have counted cycles since this one loaded.
        self.cycles = self.store.load_or(CYCLES_KEY, self.cycles.clone());
        if self.cycles.record(day) {
            self.store.save(CYCLES_KEY, &self.cycles)?;
            tracing::info!(cycles = self.cycles.cycles, "focus cycle recorded");
        } else {
            tracing::info!(%day, "focus cycle finished on an earlier day, not counted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStorage;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn durations() -> Durations {
        Durations::new(60, 20).unwrap()
    }

    #[test]
    fn focus_expiry_counts_one_cycle() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        timer.engine = TimerEngine::restore(durations(), Phase::Focus, 1, true);

        let event = timer.tick().unwrap().expect("completion");
        assert!(event.completes_cycle());
        assert_eq!(timer.engine().phase(), Phase::Break);
        assert_eq!(timer.engine().remaining_secs(), 20);
        assert!(!timer.engine().is_running());
        assert_eq!(timer.cycles_today().unwrap(), 1);

        let stored: DailyCycles = store.load_or(CYCLES_KEY, DailyCycles::new(day(1)));
        assert_eq!(stored, DailyCycles { date: "2025-06-02".into(), cycles: 1 });
    }

    #[test]
    fn skipping_break_leaves_counter_alone() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        timer.skip().unwrap();
        assert_eq!(timer.cycles_today().unwrap(), 1);

        timer.skip().unwrap();
        assert_eq!(timer.engine().phase(), Phase::Focus);
        assert_eq!(timer.engine().remaining_secs(), 60);
        assert_eq!(timer.cycles_today().unwrap(), 1);
    }

    #[test]
    fn counter_from_previous_day_resets_on_load() {
        let store = MemoryStorage::new();
        store
            .save(CYCLES_KEY, &DailyCycles { date: "2025-06-01".into(), cycles: 6 })
            .unwrap();
        let clock = FixedClock::on(day(2));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        assert_eq!(timer.cycles_today().unwrap(), 0);

        let stored: DailyCycles = store.load_or(CYCLES_KEY, DailyCycles::new(day(9)));
        assert_eq!(stored, DailyCycles::new(day(2)));
    }

    #[test]
    fn durations_persist_and_reject_bad_input() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        {
            let mut timer = FocusTimer::load(&store, &clock, durations());
            timer.set_duration_input(Phase::Focus, "1200").unwrap();
            assert!(timer.set_duration_input(Phase::Break, "-1").is_err());
            assert!(timer.set_duration_input(Phase::Break, "soon").is_err());
        }
        let timer = FocusTimer::load(&store, &clock, durations());
        assert_eq!(timer.durations(), Durations::new(1200, 20).unwrap());
        // Fresh load starts a full focus phase at the stored length.
        assert_eq!(timer.engine().remaining_secs(), 1200);
    }

    #[test]
    fn invalid_stored_durations_fall_back_to_defaults() {
        let store = MemoryStorage::new();
        store.set_raw(DURATIONS_KEY, r#"{"focus":0,"break":10}"#).unwrap();
        let clock = FixedClock::on(day(2));
        let timer = FocusTimer::load(&store, &clock, durations());
        assert_eq!(timer.durations(), durations());
    }

    #[test]
    fn reset_keeps_counter() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        timer.skip().unwrap();
        timer.start();
        timer.reset();
        assert_eq!(timer.engine().phase(), Phase::Focus);
        assert_eq!(timer.engine().remaining_secs(), 60);
        assert!(!timer.engine().is_running());
        assert_eq!(timer.cycles_today().unwrap(), 1);
    }

    #[test]
    fn running_session_catches_up_on_restore() {
        let store = MemoryStorage::new();
        let t0 = day(2).and_hms_opt(9, 0, 0).unwrap().and_utc();
        {
            let clock = FixedClock::new(day(2), t0);
            let mut timer = FocusTimer::load(&store, &clock, durations());
            timer.start();
            timer.save_session().unwrap();
        }

        let clock = FixedClock::new(day(2), t0 + Duration::milliseconds(25_400));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        assert!(timer.restore_session().unwrap().is_none());
        assert!(timer.engine().is_running());
        assert_eq!(timer.engine().remaining_secs(), 35);
    }

    #[test]
    fn restored_session_that_overran_completes_the_phase() {
        let store = MemoryStorage::new();
        let t0 = day(2).and_hms_opt(9, 0, 0).unwrap().and_utc();
        {
            let clock = FixedClock::new(day(2), t0);
            let mut timer = FocusTimer::load(&store, &clock, durations());
            timer.start();
            timer.save_session().unwrap();
        }

        let clock = FixedClock::new(day(2), t0 + Duration::minutes(10));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        let event = timer.restore_session().unwrap().expect("completion");
        assert!(event.completes_cycle());
        assert_eq!(timer.engine().phase(), Phase::Break);
        assert!(!timer.engine().is_running());
        assert_eq!(timer.cycles_today().unwrap(), 1);
    }

    #[test]
    fn paused_session_does_not_move() {
        let store = MemoryStorage::new();
        let t0 = day(2).and_hms_opt(9, 0, 0).unwrap().and_utc();
        {
            let clock = FixedClock::new(day(2), t0);
            let mut timer = FocusTimer::load(&store, &clock, durations());
            timer.start();
            timer.advance(15).unwrap();
            timer.pause();
            timer.save_session().unwrap();
        }
        let clock = FixedClock::new(day(2), t0 + Duration::hours(3));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        timer.restore_session().unwrap();
        assert_eq!(timer.engine().remaining_secs(), 45);
        assert!(!timer.engine().is_running());
    }

    #[test]
    fn no_session_means_fresh_focus() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        assert!(timer.restore_session().unwrap().is_none());
        assert_eq!(timer.engine().phase(), Phase::Focus);
        assert!(store.get_raw(SESSION_KEY).unwrap().is_none());
        timer.save_session().unwrap();
        assert!(store.get_raw(SESSION_KEY).unwrap().is_some());
    }

    #[test]
    fn refresh_adopts_a_pause_written_by_another_timer() {
        let store = MemoryStorage::new();
        let t0 = day(2).and_hms_opt(9, 0, 0).unwrap().and_utc();
        let clock = FixedClock::new(day(2), t0);
        let mut runner = FocusTimer::load(&store, &clock, durations());
        runner.start();
        runner.save_session().unwrap();
        assert_eq!(runner.refresh_session().unwrap(), SessionSync::Unchanged);

        let later = FixedClock::new(day(2), t0 + Duration::seconds(10));
        let mut other = FocusTimer::load(&store, &later, durations());
        other.restore_session().unwrap();
        other.pause();
        other.save_session().unwrap();

        let sync = runner.refresh_session().unwrap();
        assert_eq!(sync, SessionSync::Adopted { completed: None });
        assert!(!runner.engine().is_running());
        assert_eq!(runner.engine().phase(), Phase::Focus);
        assert_eq!(runner.engine().remaining_secs(), 50);
        // A paused countdown never completes, however far it is advanced.
        assert!(runner.advance(600).unwrap().is_none());
        assert_eq!(runner.cycles_today().unwrap(), 0);
        assert_eq!(runner.refresh_session().unwrap(), SessionSync::Unchanged);
    }

    #[test]
    fn refresh_follows_a_reset_written_by_another_timer() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        let mut runner = FocusTimer::load(&store, &clock, durations());
        runner.start();
        runner.advance(30).unwrap();
        runner.save_session().unwrap();

        let mut other = FocusTimer::load(&store, &clock, durations());
        other.restore_session().unwrap();
        other.skip().unwrap();
        other.reset();
        other.save_session().unwrap();

        assert!(matches!(runner.refresh_session().unwrap(), SessionSync::Adopted { .. }));
        assert_eq!(runner.engine().phase(), Phase::Focus);
        assert_eq!(runner.engine().remaining_secs(), 60);
        assert!(!runner.engine().is_running());
    }

    #[test]
    fn overrun_before_midnight_is_not_counted_on_the_next_day() {
        let store = MemoryStorage::new();
        let late = day(2).and_hms_opt(23, 58, 0).unwrap().and_utc();
        {
            let clock = FixedClock::new(day(2), late);
            let mut timer = FocusTimer::load(&store, &clock, durations());
            timer.start();
            timer.save_session().unwrap();
        }

        let morning = day(3).and_hms_opt(0, 5, 0).unwrap().and_utc();
        let clock = FixedClock::new(day(3), morning);
        let mut timer = FocusTimer::load(&store, &clock, durations());
        let event = timer.restore_session().unwrap().expect("completion");
        assert!(event.completes_cycle());
        assert_eq!(timer.engine().phase(), Phase::Break);
        assert_eq!(timer.cycles_today().unwrap(), 0);
        let stored: DailyCycles = store.load_or(CYCLES_KEY, DailyCycles::new(day(9)));
        assert_eq!(stored, DailyCycles::new(day(3)));
    }

    #[test]
    fn overrun_completion_is_stamped_at_expiry() {
        let store = MemoryStorage::new();
        let t0 = day(2).and_hms_opt(9, 0, 0).unwrap().and_utc();
        {
            let clock = FixedClock::new(day(2), t0);
            let mut timer = FocusTimer::load(&store, &clock, durations());
            timer.start();
            timer.save_session().unwrap();
        }

        let clock = FixedClock::new(day(2), t0 + Duration::minutes(5));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        match timer.restore_session().unwrap() {
            Some(Event::PhaseCompleted { at, .. }) => assert_eq!(at, t0 + Duration::seconds(60)),
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(timer.cycles_today().unwrap(), 1);
    }

    #[test]
    fn events_carry_the_injected_time() {
        let store = MemoryStorage::new();
        let clock = FixedClock::on(day(2));
        let mut timer = FocusTimer::load(&store, &clock, durations());
        match timer.start() {
            Some(Event::TimerStarted { at, .. }) => assert_eq!(at, clock.now()),
            other => panic!("expected start, got {other:?}"),
        }
    }
}
