//! Habit tracking.
//!
//! Habits live as one JSON list under the `habits` key. Each habit keeps
//! its completion dates as sorted, unique `YYYY-MM-DD` strings; the
//! [`HabitBook`] restores that invariant on load and preserves it on every
//! toggle.

mod streak;

pub use streak::calculate_streak;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::clock::{format_date, parse_date};
use crate::error::{Result, ValidationError};
use crate::records::{checked_text, generate_id, position, Record};
use crate::storage::{Storage, StorageExt};

/// Record key for the habit list.
pub const HABITS_KEY: &str = "habits";

const TITLE_MAX: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => f.write_str("Daily"),
            Frequency::Weekly => f.write_str("Weekly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(ValidationError::InvalidValue {
                field: "frequency".into(),
                message: format!("'{s}' is not Daily or Weekly"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub completion_dates: Vec<String>,
}

impl Record for Habit {
    const KIND: &'static str = "habit";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Habit {
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        let date = format_date(date);
        self.completion_dates.binary_search(&date).is_ok()
    }

    pub fn streak(&self, today: NaiveDate) -> u32 {
        calculate_streak(&self.completion_dates, self.frequency, today)
    }

    /// Re-establish sorted, unique, well-formed completion dates.
    fn normalize(&mut self) {
        let before = self.completion_dates.len();
        let days: BTreeSet<NaiveDate> = self
            .completion_dates
            .iter()
            .filter_map(|d| parse_date(d))
            .collect();
        self.completion_dates = days.into_iter().map(format_date).collect();
        if self.completion_dates.len() != before {
            tracing::debug!(
                habit = %self.id,
                dropped = before - self.completion_dates.len(),
                "dropped duplicate or malformed completion dates"
            );
        }
    }
}

/// One habit's row in the seven-day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    pub id: String,
    pub title: String,
    pub frequency: Frequency,
    pub streak: u32,
    /// Oldest first, ending today.
    pub days: Vec<(String, bool)>,
}

/// The last seven calendar days ending at `today`, oldest first.
pub fn last_seven_days(today: NaiveDate) -> Vec<NaiveDate> {
    (0..7u64)
        .rev()
        .filter_map(|n| today.checked_sub_days(Days::new(n)))
        .collect()
}

pub struct HabitBook<'a> {
    store: &'a dyn Storage,
    habits: Vec<Habit>,
}

impl<'a> HabitBook<'a> {
    pub fn load(store: &'a dyn Storage) -> Self {
        let mut habits: Vec<Habit> = store.load_or_default(HABITS_KEY);
        for habit in &mut habits {
            habit.normalize();
        }
        Self { store, habits }
    }

    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Result<&Habit> {
        let i = position(&self.habits, id)?;
        Ok(&self.habits[i])
    }

    pub fn add(&mut self, title: &str, frequency: Frequency) -> Result<&Habit> {
        let title = checked_text("title", title, 1, TITLE_MAX)?;
        self.habits.push(Habit {
            id: generate_id(),
            title,
            frequency,
            completion_dates: Vec::new(),
        });
        self.persist()?;
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Change title and frequency; completion history is kept.
    pub fn update(&mut self, id: &str, title: &str, frequency: Frequency) -> Result<&Habit> {
        let i = position(&self.habits, id)?;
        let title = checked_text("title", title, 1, TITLE_MAX)?;
        let habit = &mut self.habits[i];
        habit.title = title;
        habit.frequency = frequency;
        self.persist()?;
        Ok(&self.habits[i])
    }

    pub fn delete(&mut self, id: &str) -> Result<Habit> {
        let i = position(&self.habits, id)?;
        let removed = self.habits.remove(i);
        self.persist()?;
        Ok(removed)
    }

    /// Flip the completion mark for `date`.
    ///
    /// Returns `true` if the habit is now marked complete on that date.
    ///
    /// # Errors
    /// Rejects malformed dates and dates after `today`.
    pub fn toggle(&mut self, id: &str, date: &str, today: NaiveDate) -> Result<bool> {
        let i = position(&self.habits, id)?;
        let day =
            parse_date(date).ok_or_else(|| ValidationError::MalformedDate(date.to_string()))?;
        if day > today {
            return Err(ValidationError::FutureDate {
                date: format_date(day),
                today: format_date(today),
            }
            .into());
        }

        let key = format_date(day);
        let dates = &mut self.habits[i].completion_dates;
        let now_complete = match dates.binary_search(&key) {
            Ok(pos) => {
                dates.remove(pos);
                false
            }
            Err(pos) => {
                dates.insert(pos, key);
                true
            }
        };
        self.persist()?;
        Ok(now_complete)
    }

    pub fn streak(&self, id: &str, today: NaiveDate) -> Result<u32> {
        Ok(self.get(id)?.streak(today))
    }

    pub fn week(&self, today: NaiveDate) -> Vec<WeekRow> {
        let days = last_seven_days(today);
        self.habits
            .iter()
            .map(|h| WeekRow {
                id: h.id.clone(),
                title: h.title.clone(),
                frequency: h.frequency,
                streak: h.streak(today),
                days: days
                    .iter()
                    .map(|d| (format_date(*d), h.is_completed_on(*d)))
                    .collect(),
            })
            .collect()
    }

    fn persist(&self) -> Result<()> {
        self.store.save(HABITS_KEY, &self.habits)?;
        Ok(())
    }
}
