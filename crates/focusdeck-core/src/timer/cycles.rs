//! Completed focus cycles for the current calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{format_date, parse_date};

/// Persisted as `{ "date": "YYYY-MM-DD", "cycles": n }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCycles {
    pub date: String,
    pub cycles: u32,
}

impl DailyCycles {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: format_date(today),
            cycles: 0,
        }
    }

    /// Zero the counter if it belongs to another day.
    ///
    /// Returns `true` when the record changed and needs saving.
    pub fn rollover(&mut self, today: NaiveDate) -> bool {
        let today = format_date(today);
        if self.date == today {
            return false;
        }
        tracing::debug!(
            from = %self.date,
            to = %today,
            stale = self.cycles,
            "daily cycle counter rolled over"
        );
        self.date = today;
        self.cycles = 0;
        true
    }

    /// Count one focus phase completed on `day`.
    ///
    /// A completion dated before the day this counter holds belongs to a
    /// day that is no longer tracked and is not counted. Returns `true`
    /// when the record changed.
    pub fn record(&mut self, day: NaiveDate) -> bool {
        if parse_date(&self.date).is_some_and(|held| day < held) {
            return false;
        }
        self.rollover(day);
        self.cycles = self.cycles.saturating_add(1);
        true
    }

    /// Cycles completed on `today`.
    pub fn on(&self, today: NaiveDate) -> u32 {
        if self.date == format_date(today) {
            self.cycles
        } else {
            0
        }
    }
}
