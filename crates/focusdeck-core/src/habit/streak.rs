//! Current-streak calculation.

use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

use super::Frequency;
use crate::clock::parse_date;

/// Length of the run of consecutive completed days ending today, or ending
/// yesterday when today is not marked yet.
///
/// Input order and duplicates do not matter. Strings that are not
/// `YYYY-MM-DD` dates are ignored.
pub fn calculate_streak<I, S>(completion_dates: I, frequency: Frequency, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let days: BTreeSet<NaiveDate> = completion_dates
        .into_iter()
        .filter_map(|d| parse_date(d.as_ref()))
        .collect();
    if days.is_empty() {
        return 0;
    }

    // Weekly habits walk day by day as well.
    let step = match frequency {
        Frequency::Daily | Frequency::Weekly => Days::new(1),
    };

    let Some(yesterday) = today.checked_sub_days(step) else {
        return u32::from(days.contains(&today));
    };

    let mut streak = 0u32;
    if days.contains(&today) {
        streak = 1;
    } else if !days.contains(&yesterday) {
        return 0;
    }

    let mut day = Some(yesterday);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        streak += 1;
        day = d.checked_sub_days(step);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::format_date;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn ago(n: u64) -> String {
        format_date(today() - Days::new(n))
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(calculate_streak(Vec::<String>::new(), Frequency::Daily, today()), 0);
    }

    #[test]
    fn run_ending_today() {
        let dates = [ago(0), ago(1), ago(2)];
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 3);
    }

    #[test]
    fn run_ending_yesterday_still_counts() {
        let dates = [ago(1), ago(2), ago(3), ago(4)];
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 4);
    }

    #[test]
    fn gap_before_yesterday_stops_at_today() {
        let dates = [ago(0), ago(2), ago(3)];
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 1);
    }

    #[test]
    fn broken_chain_is_zero() {
        let dates = [ago(2), ago(3), ago(4)];
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 0);
    }

    #[test]
    fn walk_crosses_month_boundary() {
        // 2025-03-01 back into February.
        let dates = [ago(0), ago(1), ago(2)];
        assert_eq!(dates[1], "2025-02-28");
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 3);
    }

    #[test]
    fn unordered_duplicates_and_garbage_are_tolerated() {
        let dates = vec![
            ago(1),
            "not-a-date".to_string(),
            ago(0),
            ago(1),
            String::new(),
            "2025-13-01".to_string(),
            ago(2),
        ];
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 3);
    }

    #[test]
    fn future_dates_do_not_extend_the_streak() {
        let tomorrow = format_date(today() + Days::new(1));
        let dates = [tomorrow, ago(0)];
        assert_eq!(calculate_streak(&dates, Frequency::Daily, today()), 1);
    }

    #[test]
    fn weekly_uses_the_daily_walk() {
        let dates = [ago(0), ago(7), ago(14)];
        assert_eq!(calculate_streak(&dates, Frequency::Weekly, today()), 1);
        let dates = [ago(0), ago(1)];
        assert_eq!(calculate_streak(&dates, Frequency::Weekly, today()), 2);
    }
}
