//! The analytics aggregation engine.
//!
//! Pure computation over an immutable snapshot of task records: no I/O, no
//! clock reads, no shared state. The reference day is an explicit
//! parameter so every derived value is a deterministic function of
//! (snapshot, today, goal). Recomputation is always full — O(records) per
//! call, which is fine at single-user volume.
//!
//! Precondition: the snapshot is already validated. Records with an
//! unparseable `task_date` are rejected at the ingestion boundary
//! (`TaskRecord::validate`) and must never reach this module; missing
//! optional fields were defaulted at deserialization.

pub mod rollup;
pub mod score;
pub mod streak;
pub mod types;

pub use types::{
    CategorySlice, DayPoint, DayTotals, InsightDaily, InsightPayload, MetricsBundle, MonthPoint,
};

use chrono::NaiveDate;

use crate::date_util::day_key;
use crate::record::TaskRecord;

/// How many records the recent-entries list carries.
const RECENT_ENTRIES_LIMIT: usize = 5;

/// Derive the full metrics bundle from one snapshot.
pub fn aggregate(records: &[TaskRecord], today: NaiveDate, goal_minutes: u32) -> MetricsBundle {
    let daily_totals = rollup::daily_totals(records, &day_key(today));
    let goal_progress_percent =
        score::goal_progress_percent(daily_totals.actual_minutes, goal_minutes);

    MetricsBundle {
        weekly_series: rollup::weekly_series(records, today),
        monthly_series: rollup::monthly_series(records),
        category_distribution: rollup::category_distribution(records),
        streak_days: streak::completion_streak(records, today),
        weekly_average_hours: score::weekly_average_hours(records, today),
        productivity_score: score::productivity_score(records, today),
        goal_progress_percent,
        recent_entries: recent_entries(records),
        daily_totals,
    }
}

/// Select and rename the bundle fields the insight service consumes.
pub fn insight_payload(bundle: &MetricsBundle) -> InsightPayload {
    InsightPayload {
        daily: InsightDaily {
            planned: bundle.daily_totals.planned_minutes,
            actual: bundle.daily_totals.actual_minutes,
        },
        weekly: bundle.weekly_series.clone(),
        monthly: bundle.monthly_series.clone(),
        category: bundle
            .category_distribution
            .iter()
            .map(|(name, value)| CategorySlice {
                name: name.clone(),
                value: *value,
            })
            .collect(),
    }
}

fn recent_entries(records: &[TaskRecord]) -> Vec<TaskRecord> {
    let mut entries: Vec<TaskRecord> = records.to_vec();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries.truncate(RECENT_ENTRIES_LIMIT);
    entries
}
