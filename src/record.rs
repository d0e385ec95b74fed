use serde::{Deserialize, Serialize};

use crate::date_util::parse_day_key;
use crate::error::{Error, Result};

/// Task priority. Not used by aggregation; carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(Error::Other(format!(
                "unknown priority '{other}' (expected high, medium, or low)"
            ))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single logged task. Owned by the storage layer; the engine treats a
/// snapshot of these as read-only input.
///
/// Field names match the tracker app's JSON export, so `import` can read
/// it directly. Numeric fields default to 0 and `category` to empty when
/// absent — only `task_date` is structurally required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub activity: String,
    /// Calendar day key (`YYYY-MM-DD`). Immutable once set; all grouping
    /// is exact string match on this key.
    pub task_date: String,
    #[serde(default)]
    pub planned_minutes: u32,
    /// Meaningful only when `is_completed`; stored as 0 otherwise.
    #[serde(default)]
    pub actual_minutes: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: Option<String>,
    /// RFC 3339 creation timestamp; used only for recent-entry ordering.
    #[serde(default)]
    pub created_at: String,
}

impl TaskRecord {
    /// Ingestion-boundary check: a record whose `task_date` is not a real
    /// calendar date is rejected here and never reaches storage or the
    /// engine. The engine assumes a pre-validated snapshot.
    pub fn validate(&self) -> Result<()> {
        if parse_day_key(&self.task_date).is_none() {
            return Err(Error::MalformedRecord(format!(
                "task_date '{}' is not a calendar date (expected YYYY-MM-DD)",
                self.task_date
            )));
        }
        Ok(())
    }
}

/// Empty or whitespace-only categories roll up under "Other".
pub fn normalize_category(category: &str) -> &str {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        "Other"
    } else {
        trimmed
    }
}
