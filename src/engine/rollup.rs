//! Grouping and ratio rollups over a record snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_util::{last_n_days, month_key};
use crate::engine::types::{DayPoint, DayTotals, MonthPoint};
use crate::record::{normalize_category, TaskRecord};

/// `actual / planned` as a whole percentage. Zero when nothing was
/// planned. Deliberately uncapped: a day where actual exceeds planned
/// reads as over-delivery and yields a ratio above 100.
pub fn productivity_ratio(planned_minutes: u32, actual_minutes: u32) -> u32 {
    if planned_minutes == 0 {
        return 0;
    }
    (actual_minutes as f64 / planned_minutes as f64 * 100.0).round() as u32
}

/// Planned and actual sums for one day key. Planned counts every matching
/// record regardless of completion. Actual is summed as stored — an
/// incomplete record carries 0 actual by invariant, and this function
/// trusts that rather than re-filtering on `is_completed`.
pub fn daily_totals(records: &[TaskRecord], day: &str) -> DayTotals {
    let mut totals = DayTotals::default();
    for rec in records.iter().filter(|r| r.task_date == day) {
        totals.planned_minutes += rec.planned_minutes;
        totals.actual_minutes += rec.actual_minutes;
    }
    totals
}

/// Productivity ratio per day for the last 7 calendar days (inclusive of
/// `today`), oldest first.
pub fn weekly_series(records: &[TaskRecord], today: NaiveDate) -> Vec<DayPoint> {
    last_n_days(7, today)
        .into_iter()
        .map(|date| {
            let totals = daily_totals(records, &date);
            let productivity =
                productivity_ratio(totals.planned_minutes, totals.actual_minutes);
            DayPoint { date, productivity }
        })
        .collect()
}

/// Productivity ratio per distinct month in the snapshot. No fixed
/// window — this spans the snapshot's whole history, one independently
/// computed point per month, sorted by month key.
pub fn monthly_series(records: &[TaskRecord]) -> Vec<MonthPoint> {
    let mut by_month: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for rec in records {
        let entry = by_month
            .entry(month_key(&rec.task_date).to_string())
            .or_default();
        entry.0 += rec.planned_minutes;
        entry.1 += rec.actual_minutes;
    }
    by_month
        .into_iter()
        .map(|(month, (planned, actual))| MonthPoint {
            month,
            productivity: productivity_ratio(planned, actual),
        })
        .collect()
}

/// Actual minutes by category over completed tasks. Incomplete tasks have
/// no actual time to attribute and are excluded entirely; empty categories
/// land under "Other".
pub fn category_distribution(records: &[TaskRecord]) -> BTreeMap<String, u32> {
    let mut dist = BTreeMap::new();
    for rec in records.iter().filter(|r| r.is_completed) {
        *dist
            .entry(normalize_category(&rec.category).to_string())
            .or_insert(0) += rec.actual_minutes;
    }
    dist
}
