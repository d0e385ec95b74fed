use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::TaskRecord;

/// Planned vs actual minutes for a single calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayTotals {
    pub planned_minutes: u32,
    pub actual_minutes: u32,
}

/// One point of the weekly productivity chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: String,
    pub productivity: u32,
}

/// One point of the monthly productivity chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPoint {
    pub month: String,
    pub productivity: u32,
}

/// The full derived-metrics bundle for one snapshot. Rebuilt from scratch
/// on every aggregation call; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsBundle {
    pub daily_totals: DayTotals,
    /// Exactly 7 points, oldest first, ending at the reference day.
    pub weekly_series: Vec<DayPoint>,
    /// One point per distinct month in the snapshot, sorted by month key.
    pub monthly_series: Vec<MonthPoint>,
    /// Category → summed actual minutes over completed tasks.
    pub category_distribution: BTreeMap<String, u32>,
    pub streak_days: u32,
    pub weekly_average_hours: f64,
    /// Today's completion rate, 0–100.
    pub productivity_score: u32,
    /// Progress toward the daily goal, capped at 100.
    pub goal_progress_percent: u32,
    /// Up to 5 records, newest `created_at` first.
    pub recent_entries: Vec<TaskRecord>,
}

/// Planned/actual pair in the shape the insight service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightDaily {
    pub planned: u32,
    pub actual: u32,
}

/// One pie-chart slice of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub value: u32,
}

/// The subset of the bundle sent to the insight service. Field selection
/// and renaming only — no further computation happens on the way out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightPayload {
    pub daily: InsightDaily,
    pub weekly: Vec<DayPoint>,
    pub monthly: Vec<MonthPoint>,
    pub category: Vec<CategorySlice>,
}
