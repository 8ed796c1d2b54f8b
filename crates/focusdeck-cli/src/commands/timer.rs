use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use focusdeck_core::timer::{format_clock, SessionSync};
use focusdeck_core::{Config, Event, FocusTimer, Phase, SystemClock, Ticker};
use serde::Serialize;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start if paused, pause if running
    Toggle,
    /// End the current phase now
    Skip,
    /// Back to a full, stopped focus phase
    Reset,
    /// Set the focus length in seconds
    SetFocus {
        /// Positive whole number of seconds
        #[arg(allow_hyphen_values = true)]
        secs: String,
    },
    /// Set the break length in seconds
    SetBreak {
        /// Positive whole number of seconds
        #[arg(allow_hyphen_values = true)]
        secs: String,
    },
    /// Run the countdown in the foreground until the current phase ends
    Run,
}

#[derive(Serialize)]
struct TimerStatus {
    phase: Phase,
    running: bool,
    remaining_secs: u64,
    clock: String,
    focus_secs: u64,
    break_secs: u64,
    cycles_today: u32,
}

fn status(timer: &mut FocusTimer<'_>) -> Result<TimerStatus, Box<dyn std::error::Error>> {
    let engine = timer.engine();
    let (phase, running, remaining_secs) =
        (engine.phase(), engine.is_running(), engine.remaining_secs());
    let durations = timer.durations();
    Ok(TimerStatus {
        phase,
        running,
        remaining_secs,
        clock: format_clock(remaining_secs),
        focus_secs: durations.focus_secs,
        break_secs: durations.break_secs,
        cycles_today: timer.cycles_today()?,
    })
}

/// Announce a phase change on stderr, ringing the bell if configured.
fn announce(event: &Event, bell: bool) {
    if let Event::PhaseCompleted {
        from,
        skipped,
        next_secs,
        ..
    } = event
    {
        let minutes = next_secs / 60;
        let verb = if *skipped { "skipped" } else { "complete" };
        let message = match from {
            Phase::Focus => format!("Focus session {verb}! Take a {minutes}-minute break."),
            Phase::Break => format!("Break session {verb}! Time to focus for {minutes} minutes."),
        };
        if bell {
            eprint!("\x07");
        }
        eprintln!("{message}");
    }
}

fn emit(event: &Event, bell: bool) -> CmdResult {
    print_json(event)?;
    announce(event, bell);
    Ok(())
}

pub fn run(action: TimerAction) -> CmdResult {
    let config = Config::load_or_default();
    let bell = config.timer.bell;
    let store = open_store()?;
    let clock = SystemClock;
    let mut timer = FocusTimer::load(&store, &clock, config.default_durations());

    if let Some(event) = timer.restore_session()? {
        // The phase ran out while no process was watching.
        announce(&event, bell);
    }

    match action {
        TimerAction::Status => {
            let status = status(&mut timer)?;
            print_json(&status)?;
        }
        TimerAction::Start => match timer.start() {
            Some(event) => emit(&event, bell)?,
            None => print_json(&timer.snapshot())?,
        },
        TimerAction::Pause => match timer.pause() {
            Some(event) => emit(&event, bell)?,
            None => print_json(&timer.snapshot())?,
        },
        TimerAction::Toggle => {
            if let Some(event) = timer.toggle() {
                emit(&event, bell)?;
            }
        }
        TimerAction::Skip => {
            let event = timer.skip()?;
            emit(&event, bell)?;
        }
        TimerAction::Reset => {
            let event = timer.reset();
            emit(&event, bell)?;
        }
        TimerAction::SetFocus { secs } => {
            let event = timer.set_duration_input(Phase::Focus, &secs)?;
            emit(&event, bell)?;
        }
        TimerAction::SetBreak { secs } => {
            let event = timer.set_duration_input(Phase::Break, &secs)?;
            emit(&event, bell)?;
        }
        TimerAction::Run => run_foreground(&mut timer, bell)?,
    }

    timer.save_session()?;
    Ok(())
}

/// Count down in the foreground until the phase ends.
///
/// The stored session is re-read before every tick so that `pause`,
/// `reset` or `skip` issued from another invocation stop this loop
/// instead of being overwritten by it.
fn run_foreground(timer: &mut FocusTimer<'_>, bell: bool) -> CmdResult {
    timer.start();
    // Saved up front so an interrupted run keeps counting for `status`.
    timer.save_session()?;

    let phase = timer.engine().phase();
    let mut ticker = Ticker::new();
    ticker.start();
    tracing::debug!(
        %phase,
        remaining = timer.engine().remaining_secs(),
        "foreground countdown started"
    );

    let mut stderr = std::io::stderr();
    loop {
        let engine = timer.engine();
        write!(
            stderr,
            "\r{} {}  ",
            engine.phase(),
            format_clock(engine.remaining_secs())
        )?;
        stderr.flush()?;

        std::thread::sleep(ticker.until_next().unwrap_or(Duration::from_secs(1)));

        if let SessionSync::Adopted { completed } = timer.refresh_session()? {
            if let Some(event) = completed {
                writeln!(stderr)?;
                emit(&event, bell)?;
                return Ok(());
            }
            let engine = timer.engine();
            if !engine.is_running() || engine.phase() != phase {
                writeln!(stderr)?;
                eprintln!("Countdown changed by another command; stopping.");
                print_json(&timer.snapshot())?;
                return Ok(());
            }
            // The adopted session is already caught up to now.
            ticker.start();
            continue;
        }

        let elapsed = ticker.poll();
        if let Some(event) = timer.advance(elapsed)? {
            ticker.stop();
            writeln!(stderr)?;
            emit(&event, bell)?;
            return Ok(());
        }
    }
}
