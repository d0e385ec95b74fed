//! Consecutive-day completion-streak detection.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use crate::date_util::day_key;
use crate::record::TaskRecord;

/// Scan bound: a streak is never counted past a year back.
const MAX_STREAK_DAYS: u32 = 365;

/// Number of consecutive calendar days ending at `today` that each have at
/// least one completed task. A single greedy backward pass: the first day
/// with no completion ends the streak, including `today` itself (no
/// completion today means the streak is 0).
pub fn completion_streak(records: &[TaskRecord], today: NaiveDate) -> u32 {
    let completed_days: HashSet<&str> = records
        .iter()
        .filter(|r| r.is_completed)
        .map(|r| r.task_date.as_str())
        .collect();

    let mut streak = 0;
    for offset in 0..MAX_STREAK_DAYS {
        let day = day_key(today - Duration::days(offset as i64));
        if !completed_days.contains(day.as_str()) {
            break;
        }
        streak += 1;
    }
    streak
}
