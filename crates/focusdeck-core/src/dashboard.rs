//! Cross-module summary numbers.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::clock::format_date;
use crate::habit::Habit;
use crate::note::Note;
use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStart {
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn from_config(monday: bool) -> Self {
        if monday {
            WeekStart::Monday
        } else {
            WeekStart::Sunday
        }
    }

    /// First day of the week containing `today`.
    pub fn start_of_week(self, today: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Sunday => today.weekday().num_days_from_sunday(),
            WeekStart::Monday => today.weekday().num_days_from_monday(),
        };
        today
            .checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub date: String,
    pub tasks_due_today: usize,
    pub tasks_completed_this_week: usize,
    pub focus_cycles_today: u32,
    pub habits_marked_today: usize,
    pub total_notes: usize,
}

impl Dashboard {
    /// "Completed this week" counts completed tasks whose due date falls
    /// on or after the start of the current week.
    pub fn collect(
        tasks: &[Task],
        notes: &[Note],
        habits: &[Habit],
        focus_cycles_today: u32,
        today: NaiveDate,
        week_start: WeekStart,
    ) -> Self {
        let today_str = format_date(today);
        let week_begins = week_start.start_of_week(today);

        let tasks_due_today = tasks
            .iter()
            .filter(|t| t.is_pending() && t.due_date == today_str)
            .count();
        let tasks_completed_this_week = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .filter(|t| t.due().is_some_and(|d| d >= week_begins))
            .count();
        let habits_marked_today = habits.iter().filter(|h| h.is_completed_on(today)).count();

        Self {
            date: today_str,
            tasks_due_today,
            tasks_completed_this_week,
            focus_cycles_today,
            habits_marked_today,
            total_notes: notes.len(),
        }
    }
}
