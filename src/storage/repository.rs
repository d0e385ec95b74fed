use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::query::{TaskQuery, Window};
use crate::record::{Priority, TaskRecord};

const TASK_COLUMNS: &str = "id, user_id, activity, task_date, planned_minutes, actual_minutes, \
                            is_completed, category, priority, notes, created_at";

fn row_to_record(row: &rusqlite::Row<'_>) -> Result<TaskRecord, rusqlite::Error> {
    let priority: String = row.get(8)?;
    Ok(TaskRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        activity: row.get(2)?,
        task_date: row.get(3)?,
        planned_minutes: row.get(4)?,
        actual_minutes: row.get(5)?,
        is_completed: row.get::<_, i64>(6)? != 0,
        category: row.get(7)?,
        priority: priority.parse::<Priority>().unwrap_or_default(),
        notes: row.get(9)?,
        created_at: row.get(10)?,
    })
}

// ── Tasks ──────────────────────────────────────────────────────────

pub fn insert_task(conn: &Connection, task: &TaskRecord) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO tasks (
            id, user_id, activity, task_date, planned_minutes, actual_minutes,
            is_completed, category, priority, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            task.id,
            task.user_id,
            task.activity,
            task.task_date,
            task.planned_minutes,
            task.actual_minutes,
            task.is_completed as i64,
            task.category,
            task.priority.as_str(),
            task.notes,
            task.created_at,
        ],
    )?;
    Ok(())
}

/// Mark a task completed with its actual minutes. Returns the number of
/// rows updated (0 when the id is unknown).
pub fn complete_task(
    conn: &Connection,
    id: &str,
    actual_minutes: u32,
) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "UPDATE tasks SET is_completed = 1, actual_minutes = ?2 WHERE id = ?1",
        params![id, actual_minutes],
    )
}

pub fn delete_task(conn: &Connection, id: &str) -> Result<usize, rusqlite::Error> {
    conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])
}

pub fn get_task(conn: &Connection, id: &str) -> Result<Option<TaskRecord>, rusqlite::Error> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_record,
    )
    .optional()
}

/// Fetch the snapshot for a view window. This is the engine's input
/// boundary: the store scopes by date range here so the aggregation call
/// never filters storage-side concerns itself.
pub fn fetch_snapshot(
    conn: &Connection,
    window: Window,
    today: NaiveDate,
) -> Result<Vec<TaskRecord>, rusqlite::Error> {
    let (sql, bounds) = match window.bounds(today) {
        Some((start, end)) => (
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE task_date >= ?1 AND task_date <= ?2
                 ORDER BY task_date, created_at"
            ),
            Some((start, end)),
        ),
        None => (
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY task_date, created_at"),
            None,
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = match &bounds {
        Some((start, end)) => stmt.query_map(params![start, end], row_to_record)?,
        None => stmt.query_map([], row_to_record)?,
    };
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Run a filtered list query built by `TaskQuery`.
pub fn query_tasks(
    conn: &Connection,
    query: &TaskQuery,
) -> Result<Vec<TaskRecord>, rusqlite::Error> {
    let (clause, query_params) = query.to_sql();
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks {clause}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(query_params), row_to_record)?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

/// Store-level counts for the `status` command.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub tasks: i64,
    pub completed: i64,
    pub categories: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn store_stats(conn: &Connection) -> Result<StoreStats, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*),
                SUM(CASE WHEN is_completed = 1 THEN 1 ELSE 0 END),
                COUNT(DISTINCT category),
                MIN(task_date),
                MAX(task_date)
         FROM tasks",
        [],
        |row| {
            Ok(StoreStats {
                tasks: row.get(0)?,
                completed: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
                categories: row.get(2)?,
                first_date: row.get(3)?,
                last_date: row.get(4)?,
            })
        },
    )
}

// ── App config ─────────────────────────────────────────────────────

pub fn get_config(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT value FROM app_config WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO app_config (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

pub fn list_config(conn: &Connection) -> Result<Vec<(String, String)>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT key, value FROM app_config ORDER BY key")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    Ok(rows.filter_map(|r| r.ok()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn task(id: &str, date: &str, created_at: &str) -> TaskRecord {
        TaskRecord {
            id: id.into(),
            user_id: "local".into(),
            activity: "Reading".into(),
            task_date: date.into(),
            planned_minutes: 60,
            actual_minutes: 0,
            is_completed: false,
            category: "Study".into(),
            priority: Priority::High,
            notes: Some("chapter 4".into()),
            created_at: created_at.into(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = Database::open_memory().await.unwrap();
        let rec = task("t1", "2025-03-10", "2025-03-10T08:00:00Z");
        let inserted = rec.clone();
        db.writer()
            .call(move |conn| insert_task(conn, &inserted))
            .await
            .unwrap();

        let fetched = db
            .reader()
            .call(|conn| get_task(conn, "t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched, rec);
    }

    #[tokio::test]
    async fn test_complete_task_sets_actual() {
        let db = Database::open_memory().await.unwrap();
        let rec = task("t1", "2025-03-10", "2025-03-10T08:00:00Z");
        db.writer()
            .call(move |conn| insert_task(conn, &rec))
            .await
            .unwrap();

        let updated = db
            .writer()
            .call(|conn| complete_task(conn, "t1", 45))
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let fetched = db
            .reader()
            .call(|conn| get_task(conn, "t1"))
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.is_completed);
        assert_eq!(fetched.actual_minutes, 45);

        let missing = db
            .writer()
            .call(|conn| complete_task(conn, "nope", 45))
            .await
            .unwrap();
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let db = Database::open_memory().await.unwrap();
        let rec = task("t1", "2025-03-10", "2025-03-10T08:00:00Z");
        db.writer()
            .call(move |conn| insert_task(conn, &rec))
            .await
            .unwrap();

        let deleted = db.writer().call(|conn| delete_task(conn, "t1")).await.unwrap();
        assert_eq!(deleted, 1);
        let gone = db.reader().call(|conn| get_task(conn, "t1")).await.unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn test_fetch_snapshot_windows() {
        let db = Database::open_memory().await.unwrap();
        db.writer()
            .call(|conn| {
                insert_task(conn, &task("t1", "2025-03-10", "2025-03-10T08:00:00Z"))?;
                insert_task(conn, &task("t2", "2025-03-05", "2025-03-05T08:00:00Z"))?;
                insert_task(conn, &task("t3", "2025-01-01", "2025-01-01T08:00:00Z"))?;
                Ok::<(), rusqlite::Error>(())
            })
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let all = db
            .reader()
            .call(move |conn| fetch_snapshot(conn, Window::All, today))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        // Chronological fetch order
        assert_eq!(all[0].id, "t3");

        let week = db
            .reader()
            .call(move |conn| fetch_snapshot(conn, Window::TRAILING_7, today))
            .await
            .unwrap();
        assert_eq!(week.len(), 2);

        let just_today = db
            .reader()
            .call(move |conn| fetch_snapshot(conn, Window::Today, today))
            .await
            .unwrap();
        assert_eq!(just_today.len(), 1);
        assert_eq!(just_today[0].id, "t1");
    }

    #[tokio::test]
    async fn test_query_tasks_filters() {
        let db = Database::open_memory().await.unwrap();
        db.writer()
            .call(|conn| {
                let mut done = task("t1", "2025-03-10", "2025-03-10T09:00:00Z");
                done.is_completed = true;
                done.actual_minutes = 30;
                done.category = "Work".into();
                insert_task(conn, &done)?;
                insert_task(conn, &task("t2", "2025-03-10", "2025-03-10T08:00:00Z"))?;
                Ok::<(), rusqlite::Error>(())
            })
            .await
            .unwrap();

        let work = db
            .reader()
            .call(|conn| query_tasks(conn, &TaskQuery::new().category("Work")))
            .await
            .unwrap();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].id, "t1");

        let open = db
            .reader()
            .call(|conn| query_tasks(conn, &TaskQuery::new().completed(false)))
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, "t2");
    }

    #[tokio::test]
    async fn test_store_stats() {
        let db = Database::open_memory().await.unwrap();
        db.writer()
            .call(|conn| {
                let mut done = task("t1", "2025-03-10", "2025-03-10T09:00:00Z");
                done.is_completed = true;
                insert_task(conn, &done)?;
                insert_task(conn, &task("t2", "2025-01-05", "2025-01-05T08:00:00Z"))?;
                Ok::<(), rusqlite::Error>(())
            })
            .await
            .unwrap();

        let stats = db.reader().call(|conn| store_stats(conn)).await.unwrap();
        assert_eq!(stats.tasks, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.first_date.as_deref(), Some("2025-01-05"));
        assert_eq!(stats.last_date.as_deref(), Some("2025-03-10"));
    }

    #[tokio::test]
    async fn test_config_roundtrip() {
        let db = Database::open_memory().await.unwrap();
        db.writer()
            .call(|conn| set_config(conn, "goal_minutes", "480"))
            .await
            .unwrap();

        let value = db
            .reader()
            .call(|conn| get_config(conn, "goal_minutes"))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("480"));

        let missing = db
            .reader()
            .call(|conn| get_config(conn, "nope"))
            .await
            .unwrap();
        assert!(missing.is_none());

        let all = db.reader().call(|conn| list_config(conn)).await.unwrap();
        assert_eq!(all, vec![("goal_minutes".to_string(), "480".to_string())]);
    }
}
