//! Daily scoring: completion rate, goal progress, trailing weekly average.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::date_util::{day_key, last_n_days};
use crate::record::TaskRecord;

/// Default daily goal: 6 hours of actual time.
pub const DEFAULT_GOAL_MINUTES: u32 = 360;

/// Average completed hours per day over the trailing 7-day window
/// (inclusive of `today`). The divisor is always 7, not the number of days
/// with data — a week-old account with 3 logged days is averaged over 7.
pub fn weekly_average_hours(records: &[TaskRecord], today: NaiveDate) -> f64 {
    let window: HashSet<String> = last_n_days(7, today).into_iter().collect();
    let total_minutes: u32 = records
        .iter()
        .filter(|r| r.is_completed && window.contains(&r.task_date))
        .map(|r| r.actual_minutes)
        .sum();
    total_minutes as f64 / 7.0 / 60.0
}

/// Today's completion rate as a whole percentage: completed over total
/// among today's records, 0 when nothing is logged today.
pub fn productivity_score(records: &[TaskRecord], today: NaiveDate) -> u32 {
    let day = day_key(today);
    let todays: Vec<&TaskRecord> = records.iter().filter(|r| r.task_date == day).collect();
    if todays.is_empty() {
        return 0;
    }
    let completed = todays.iter().filter(|r| r.is_completed).count();
    (completed as f64 / todays.len() as f64 * 100.0).round() as u32
}

/// Progress toward the daily goal, capped at 100. A zero goal reads as
/// nothing to progress toward.
pub fn goal_progress_percent(today_actual_minutes: u32, goal_minutes: u32) -> u32 {
    if goal_minutes == 0 {
        return 0;
    }
    let pct = (today_actual_minutes as f64 / goal_minutes as f64 * 100.0).round() as u32;
    pct.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Priority;

    fn rec(date: &str, actual: u32, completed: bool) -> TaskRecord {
        TaskRecord {
            id: String::new(),
            user_id: "local".into(),
            activity: String::new(),
            task_date: date.into(),
            planned_minutes: 60,
            actual_minutes: actual,
            is_completed: completed,
            category: "Work".into(),
            priority: Priority::Medium,
            notes: None,
            created_at: String::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_weekly_average_always_divides_by_seven() {
        // 420 completed minutes on a single day still averages over 7 days.
        let records = vec![rec("2025-03-10", 420, true)];
        assert_eq!(weekly_average_hours(&records, today()), 1.0);
    }

    #[test]
    fn test_weekly_average_window_excludes_older_days() {
        let records = vec![
            rec("2025-03-10", 60, true),
            rec("2025-03-04", 60, true), // oldest day inside the window
            rec("2025-03-03", 600, true), // one day outside
        ];
        let hours = weekly_average_hours(&records, today());
        assert!((hours - 120.0 / 7.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_average_excludes_incomplete() {
        let records = vec![rec("2025-03-10", 60, true), rec("2025-03-10", 300, false)];
        assert!((weekly_average_hours(&records, today()) - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_productivity_score_no_records_today() {
        let records = vec![rec("2025-03-09", 60, true)];
        assert_eq!(productivity_score(&records, today()), 0);
    }

    #[test]
    fn test_productivity_score_rounds_completion_rate() {
        let records = vec![
            rec("2025-03-10", 60, true),
            rec("2025-03-10", 0, false),
            rec("2025-03-10", 0, false),
        ];
        // 1/3 completed
        assert_eq!(productivity_score(&records, today()), 33);
    }

    #[test]
    fn test_productivity_score_all_completed() {
        let records = vec![rec("2025-03-10", 30, true)];
        assert_eq!(productivity_score(&records, today()), 100);
    }

    #[test]
    fn test_goal_progress_capped_at_100() {
        assert_eq!(goal_progress_percent(30, DEFAULT_GOAL_MINUTES), 8);
        assert_eq!(goal_progress_percent(360, DEFAULT_GOAL_MINUTES), 100);
        assert_eq!(goal_progress_percent(9999, DEFAULT_GOAL_MINUTES), 100);
        assert_eq!(goal_progress_percent(0, DEFAULT_GOAL_MINUTES), 0);
    }

    #[test]
    fn test_goal_progress_zero_goal() {
        assert_eq!(goal_progress_percent(120, 0), 0);
    }
}
