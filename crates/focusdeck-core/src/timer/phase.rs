use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// 25 minutes.
pub const DEFAULT_FOCUS_SECS: u64 = 25 * 60;
/// 5 minutes.
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured phase lengths in seconds. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    #[serde(rename = "focus")]
    pub focus_secs: u64,
    #[serde(rename = "break")]
    pub break_secs: u64,
}

impl Durations {
    /// # Errors
    /// Returns a validation error if either length is zero.
    pub fn new(focus_secs: u64, break_secs: u64) -> Result<Self, ValidationError> {
        check_positive(Phase::Focus, focus_secs)?;
        check_positive(Phase::Break, break_secs)?;
        Ok(Self {
            focus_secs,
            break_secs,
        })
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_secs,
            Phase::Break => self.break_secs,
        }
    }

    /// Replace one phase's length, leaving `self` untouched on error.
    pub fn set(&mut self, phase: Phase, secs: u64) -> Result<(), ValidationError> {
        check_positive(phase, secs)?;
        match phase {
            Phase::Focus => self.focus_secs = secs,
            Phase::Break => self.break_secs = secs,
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.focus_secs > 0 && self.break_secs > 0
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_secs: DEFAULT_FOCUS_SECS,
            break_secs: DEFAULT_BREAK_SECS,
        }
    }
}

fn check_positive(phase: Phase, secs: u64) -> Result<(), ValidationError> {
    if secs == 0 {
        return Err(ValidationError::InvalidDuration {
            phase: phase.to_string(),
            input: secs.to_string(),
        });
    }
    Ok(())
}

/// Parse user-supplied seconds for `phase`.
///
/// Rejects anything that is not a whole number greater than zero.
pub fn parse_duration(phase: Phase, input: &str) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::InvalidDuration {
        phase: phase.to_string(),
        input: input.to_string(),
    };
    let secs: i64 = input.trim().parse().map_err(|_| invalid())?;
    if secs <= 0 {
        return Err(invalid());
    }
    Ok(secs as u64)
}

/// Render seconds as `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
