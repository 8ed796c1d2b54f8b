mod cycles;
mod engine;
mod phase;
mod service;
mod ticker;

pub use cycles::DailyCycles;
pub use engine::TimerEngine;
pub use phase::{
    format_clock, parse_duration, Durations, Phase, DEFAULT_BREAK_SECS, DEFAULT_FOCUS_SECS,
};
pub use service::{
    FocusTimer, SessionSync, TimerSession, CYCLES_KEY, DURATIONS_KEY, SESSION_KEY,
};
pub use ticker::Ticker;
