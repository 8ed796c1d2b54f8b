//! Calendar and wall-clock access.
//!
//! Everything date-sensitive (streaks, the daily cycle counter, task due
//! dates) asks a [`Clock`] for "today" instead of reading the system time
//! directly, so tests can pin the calendar.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Date format used for every persisted calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Clock {
    /// The caller's current calendar date.
    fn today(&self) -> NaiveDate;

    /// Current wall-clock instant.
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date of `at` in the caller's zone.
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate;
}

/// Reads the local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&Local).date_naive()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self { today, now }
    }

    /// Frozen at midday UTC on `today`.
    pub fn on(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { today, now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// `today` shifted by the whole UTC days between `now` and `at`.
    fn date_of(&self, at: DateTime<Utc>) -> NaiveDate {
        let shift = at.date_naive() - self.now.date_naive();
        self.today.checked_add_signed(shift).unwrap_or(self.today)
    }
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` string. Surrounding whitespace is ignored.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_are_inverse_for_valid_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format_date(d), "2024-02-29");
        assert_eq!(parse_date("2024-02-29"), Some(d));
        assert_eq!(parse_date(" 2024-02-29 "), Some(d));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn fixed_clock_reports_its_date() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let clock = FixedClock::on(d);
        assert_eq!(clock.today(), d);
        assert_eq!(clock.now().date_naive(), d);
    }

    #[test]
    fn fixed_clock_dates_other_instants_relative_to_today() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let clock = FixedClock::on(d);
        let day_before = clock.now() - chrono::Duration::hours(13);
        assert_eq!(clock.date_of(clock.now()), d);
        assert_eq!(clock.date_of(day_before), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
