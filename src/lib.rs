pub mod date_util;
pub mod engine;
pub mod error;
pub mod llm;
pub mod query;
pub mod record;
pub mod storage;

pub use engine::{aggregate, insight_payload, InsightPayload, MetricsBundle};
pub use error::{Error, Result};
pub use query::{TaskQuery, Window};
pub use record::{Priority, TaskRecord};
pub use storage::Database;

// Re-export repository types needed by the binary crate, but not the module itself
pub use storage::repository::StoreStats;

use chrono::NaiveDate;

use storage::repository;

/// Input for a new task entry. The id, owner, and creation timestamp are
/// filled in by the tracker.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub activity: String,
    pub task_date: NaiveDate,
    pub planned_minutes: u32,
    pub category: String,
    pub priority: Priority,
    pub notes: Option<String>,
}

/// Outcome of a JSON import: how many records landed and how many were
/// rejected at the ingestion boundary.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub rejected: usize,
}

/// Main entry point for the task tracker: CRUD over the local store plus
/// snapshot fetching for the aggregation engine.
pub struct Tracker {
    db: Database,
}

impl Tracker {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Access the database (for direct queries in the CLI).
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The owner id stamped on new records. The local store is
    /// single-user; defaults to "local" unless configured.
    pub async fn user_id(&self) -> Result<String> {
        let configured = self
            .db
            .reader()
            .call(|conn| repository::get_config(conn, "user_id"))
            .await?;
        Ok(configured.unwrap_or_else(|| "local".to_string()))
    }

    /// The daily goal in minutes (default 6 hours). An unparseable
    /// configured value falls back to the default with a warning.
    pub async fn goal_minutes(&self) -> Result<u32> {
        let configured = self
            .db
            .reader()
            .call(|conn| repository::get_config(conn, "goal_minutes"))
            .await?;
        Ok(match configured {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("ignoring unparseable goal_minutes config '{raw}'");
                engine::score::DEFAULT_GOAL_MINUTES
            }),
            None => engine::score::DEFAULT_GOAL_MINUTES,
        })
    }

    // ── Entry CRUD ─────────────────────────────────────────────────

    pub async fn add_task(&self, new: NewTask) -> Result<TaskRecord> {
        let task = TaskRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.user_id().await?,
            activity: new.activity,
            task_date: date_util::day_key(new.task_date),
            planned_minutes: new.planned_minutes,
            actual_minutes: 0,
            is_completed: false,
            category: new.category,
            priority: new.priority,
            notes: new.notes,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        task.validate()?;

        let inserted = task.clone();
        self.db
            .writer()
            .call(move |conn| repository::insert_task(conn, &inserted))
            .await?;
        Ok(task)
    }

    /// Mark a task completed, recording its actual minutes.
    pub async fn complete_task(&self, id: &str, actual_minutes: u32) -> Result<()> {
        let task_id = id.to_string();
        let updated = self
            .db
            .writer()
            .call(move |conn| repository::complete_task(conn, &task_id, actual_minutes))
            .await?;
        if updated == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let task_id = id.to_string();
        let deleted = self
            .db
            .writer()
            .call(move |conn| repository::delete_task(conn, &task_id))
            .await?;
        if deleted == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub async fn list_tasks(&self, query: TaskQuery) -> Result<Vec<TaskRecord>> {
        self.db
            .reader()
            .call(move |conn| repository::query_tasks(conn, &query))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ── Aggregation ────────────────────────────────────────────────

    /// Fetch the record snapshot for a view window. Aggregation itself is
    /// pure — this is the only storage touch on the metrics path.
    pub async fn snapshot(&self, window: Window, today: NaiveDate) -> Result<Vec<TaskRecord>> {
        self.db
            .reader()
            .call(move |conn| repository::fetch_snapshot(conn, window, today))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Fetch a snapshot and derive the metrics bundle. `today` is explicit
    /// so callers (and tests) control the reference day; `goal` overrides
    /// the configured daily goal when given.
    pub async fn metrics(
        &self,
        window: Window,
        today: NaiveDate,
        goal: Option<u32>,
    ) -> Result<MetricsBundle> {
        let goal_minutes = match goal {
            Some(g) => g,
            None => self.goal_minutes().await?,
        };
        let records = self.snapshot(window, today).await?;
        Ok(engine::aggregate(&records, today, goal_minutes))
    }

    /// Aggregate the full history and ask the insight service for
    /// suggestions. Fails with `Error::Llm` when the service does; the
    /// caller decides whether to substitute the fallback message.
    pub async fn insight(&self, today: NaiveDate) -> Result<String> {
        let bundle = self.metrics(Window::All, today, None).await?;
        let payload = engine::insight_payload(&bundle);
        let agent = llm::create_agent(&self.db).await?;
        llm::insight::generate_insight(&agent, &payload).await
    }

    // ── Import ─────────────────────────────────────────────────────

    /// Import records from the tracker app's JSON export. Each record is
    /// validated at this boundary: malformed ones are rejected (with a
    /// warning) and counted, never stored or aggregated. Missing ids,
    /// owner, and creation timestamps are filled in.
    pub async fn import_records(&self, records: Vec<TaskRecord>) -> Result<ImportReport> {
        let user_id = self.user_id().await?;
        let mut report = ImportReport::default();
        let mut accepted = Vec::with_capacity(records.len());

        for mut rec in records {
            if let Err(e) = rec.validate() {
                log::warn!("skipping record '{}': {e}", rec.activity);
                report.rejected += 1;
                continue;
            }
            if rec.id.is_empty() {
                rec.id = uuid::Uuid::new_v4().to_string();
            }
            if rec.user_id.is_empty() {
                rec.user_id = user_id.clone();
            }
            if rec.created_at.is_empty() {
                rec.created_at = chrono::Utc::now().to_rfc3339();
            }
            accepted.push(rec);
        }

        report.imported = accepted.len();
        self.db
            .writer()
            .call(move |conn| {
                for rec in &accepted {
                    repository::insert_task(conn, rec)?;
                }
                Ok::<(), rusqlite::Error>(())
            })
            .await?;
        Ok(report)
    }

    // ── Config commands ────────────────────────────────────────────

    pub async fn config_get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .reader()
            .call({
                let key = key.to_string();
                move |conn| repository::get_config(conn, &key)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .writer()
            .call({
                let key = key.to_string();
                let value = value.to_string();
                move |conn| repository::set_config(conn, &key, &value)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn config_list(&self) -> Result<Vec<(String, String)>> {
        self.db
            .reader()
            .call(|conn| repository::list_config(conn))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}
