//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, filter and search APIs over the `tasks` table.
//! - Own the boolean/priority coercion between SQLite and the model.
//!
//! # Invariants
//! - Every list path orders by `completed ASC, created_at DESC, id DESC`.
//! - `completed` is written as `0/1` and read back as `bool`; any other
//!   stored value is reported as invalid data.
//! - Timestamps are generated by SQLite, never by the caller.

use super::schema::ensure_table_ready;
use super::{RepoError, RepoResult};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStats};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    completed,
    category,
    priority,
    created_at,
    updated_at
FROM tasks";

const TASK_ORDER_SQL: &str = " ORDER BY completed ASC, created_at DESC, id DESC";

const TASK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "completed",
    "category",
    "priority",
    "created_at",
    "updated_at",
];

/// Filter options for listing tasks. Fields combine with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Exact, case-sensitive category match.
    pub category: Option<String>,
    /// Case-sensitive substring match on the title.
    pub title_contains: Option<String>,
}

impl TaskQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            title_contains: None,
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            category: None,
            title_contains: Some(text.into()),
        }
    }
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    /// Inserts a validated task and returns its store-assigned id.
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId>;
    /// Gets one task by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks matching `query` in the canonical order.
    fn list_tasks(&self, query: &TaskQuery) -> RepoResult<Vec<Task>>;
    /// Applies a partial update and refreshes `updated_at`.
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<()>;
    /// Flips the completion flag.
    fn toggle_task(&self, id: TaskId) -> RepoResult<()>;
    /// Deletes a task. Returns whether a row was removed.
    fn delete_task(&self, id: TaskId) -> RepoResult<bool>;
    /// Returns aggregate counters over all tasks.
    fn task_stats(&self) -> RepoResult<TaskStats>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for foreign schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId> {
        self.conn.execute(
            &format!(
                "INSERT INTO tasks (
                    title,
                    completed,
                    category,
                    priority,
                    created_at,
                    updated_at
                ) VALUES (?1, 0, ?2, ?3, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
            ),
            params![
                task.title.as_str(),
                task.category.as_str(),
                task.priority.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category.as_ref() {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        // instr() is byte-exact, unlike LIKE which folds ASCII case and
        // treats `%`/`_` as wildcards.
        if let Some(text) = query.title_contains.as_ref().filter(|t| !t.trim().is_empty()) {
            sql.push_str(" AND instr(title, ?) > 0");
            bind_values.push(Value::Text(text.clone()));
        }

        sql.push_str(TASK_ORDER_SQL);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<()> {
        let patch = patch.validated()?;

        let changed = self.conn.execute(
            &format!(
                "UPDATE tasks
                 SET
                    title = COALESCE(?1, title),
                    completed = COALESCE(?2, completed),
                    category = COALESCE(?3, category),
                    priority = COALESCE(?4, priority),
                    updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                 WHERE id = ?5;"
            ),
            params![
                patch.title.as_deref(),
                patch.completed.map(bool_to_int),
                patch.category.as_deref(),
                patch.priority.map(Priority::as_str),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn toggle_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE tasks
                 SET
                    completed = 1 - completed,
                    updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                 WHERE id = ?1;"
            ),
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn task_stats(&self) -> RepoResult<TaskStats> {
        let (total, completed): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM tasks;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let total = count_to_u64(total, "tasks.count")?;
        let completed = count_to_u64(completed, "tasks.completed_sum")?;

        Ok(TaskStats {
            total,
            completed,
            active: total.saturating_sub(completed),
        })
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;

    let completed = int_to_bool(row.get::<_, i64>("completed")?).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid completed value in tasks.completed (id={id})"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority (id={id})"
        ))
    })?;

    Ok(Task {
        id,
        title: row.get("title")?,
        completed,
        category: row.get("category")?,
        priority,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn count_to_u64(value: i64, column: &str) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}
