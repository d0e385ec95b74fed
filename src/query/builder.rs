use rusqlite::types::Value;

/// Builder for task list queries with optional filters. Compiles to a
/// WHERE clause plus bound values; the repository owns the surrounding
/// SELECT.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    category: Option<String>,
    completed: Option<bool>,
    date_after: Option<String>,
    date_before: Option<String>,
    limit: Option<u32>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn completed(mut self, val: bool) -> Self {
        self.completed = Some(val);
        self
    }

    /// Inclusive lower day-key bound.
    pub fn date_after(mut self, day_key: &str) -> Self {
        self.date_after = Some(day_key.to_string());
        self
    }

    /// Inclusive upper day-key bound.
    pub fn date_before(mut self, day_key: &str) -> Self {
        self.date_before = Some(day_key.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compile to `(where_clause, params)`. The clause starts with
    /// `WHERE` when any filter is set and is empty otherwise; parameters
    /// are positional in clause order.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(ref category) = self.category {
            conditions.push("category = ?".to_string());
            params.push(Value::from(category.clone()));
        }
        if let Some(completed) = self.completed {
            conditions.push("is_completed = ?".to_string());
            params.push(Value::from(completed as i64));
        }
        if let Some(ref after) = self.date_after {
            conditions.push("task_date >= ?".to_string());
            params.push(Value::from(after.clone()));
        }
        if let Some(ref before) = self.date_before {
            conditions.push("task_date <= ?".to_string());
            params.push(Value::from(before.clone()));
        }

        let mut sql = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        sql.push_str(" ORDER BY task_date DESC, created_at DESC");
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        (sql, params)
    }
}
