//! Action layer over the task store.
//!
//! # Responsibility
//! - Wrap every store call into an [`ActionResult`] envelope.
//! - Map errors: validation/not-found text is surfaced verbatim, storage
//!   failures are logged and replaced by a generic message.
//!
//! # Invariants
//! - No action panics or returns a Rust error to its caller.
//! - Successful writes return the full stored row, not an echo of input.

use crate::config::AppConfig;
use crate::result::ActionResult;
use crate::store::{SharedStore, StoreError, StoreLocation};
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use todo_core::{
    Category, CategoryService, ErrorKind, Priority, SqliteCategoryRepository,
    SqliteTaskRepository, Task, TaskId, TaskPatch, TaskService, TaskStats, ALL_CATEGORIES,
};

/// Message shown to the user for any storage-level failure.
pub const STORAGE_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

static SHARED_ACTIONS: OnceCell<TodoActions> = OnceCell::new();

/// Form input for task creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Raw priority label from the form (`low|medium|high`).
    #[serde(default)]
    pub priority: Option<String>,
}

impl CreateTaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Entry point for every UI-facing task/category action.
pub struct TodoActions {
    store: SharedStore,
}

impl TodoActions {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Actions over a private, volatile database.
    pub fn in_memory() -> Self {
        Self::new(SharedStore::new(StoreLocation::Memory))
    }

    /// Process-wide instance backed by the configured database file.
    ///
    /// The database itself is opened on the first action, not here.
    pub fn shared() -> &'static TodoActions {
        SHARED_ACTIONS.get_or_init(|| {
            let config = AppConfig::from_env();
            info!(
                "event=actions_init module=actions status=ok db_path={}",
                config.db_path.display()
            );
            Self::new(SharedStore::new(StoreLocation::File(config.db_path)))
        })
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn create_task(&self, input: &CreateTaskInput) -> ActionResult<Task> {
        let priority = match input.priority.as_deref().map(str::parse::<Priority>) {
            Some(Ok(priority)) => Some(priority),
            Some(Err(err)) => return ActionResult::failure(err.to_string()),
            None => None,
        };
        let result = self.with_tasks("create_task", |tasks| {
            tasks.create(&input.title, input.category.as_deref(), priority)
        });
        respond(result, |task| {
            ActionResult::ok_with_message(task, "Task created successfully")
        })
    }

    /// Sets the completion flag to `completed` and returns the stored row.
    pub fn toggle_task(&self, id: TaskId, completed: bool) -> ActionResult<Task> {
        let result = self.with_tasks("toggle_task", |tasks| tasks.set_completed(id, completed));
        respond(result, ActionResult::ok)
    }

    pub fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ActionResult<Task> {
        let result = self.with_tasks("update_task", |tasks| tasks.update(id, patch));
        respond(result, |task| {
            ActionResult::ok_with_message(task, "Task updated successfully")
        })
    }

    /// Deletes a task. Deleting an unknown id still succeeds.
    pub fn delete_task(&self, id: TaskId) -> ActionResult<()> {
        let result = self.with_tasks("delete_task", |tasks| tasks.delete(id));
        respond(result, |_| ActionResult::done("Task deleted successfully"))
    }

    pub fn list_tasks(&self) -> ActionResult<Vec<Task>> {
        respond(self.with_tasks("list_tasks", |tasks| tasks.list_all()), ActionResult::ok)
    }

    /// Lists one category; the sentinel `all` lists everything.
    pub fn list_tasks_by_category(&self, name: &str) -> ActionResult<Vec<Task>> {
        let result = self.with_tasks("list_tasks_by_category", |tasks| {
            if name == ALL_CATEGORIES {
                tasks.list_all()
            } else {
                tasks.list_by_category(name)
            }
        });
        respond(result, ActionResult::ok)
    }

    pub fn search_tasks(&self, query: &str) -> ActionResult<Vec<Task>> {
        respond(
            self.with_tasks("search_tasks", |tasks| tasks.search(query)),
            ActionResult::ok,
        )
    }

    pub fn categories_with_counts(&self) -> ActionResult<Vec<Category>> {
        let result = self.run("categories_with_counts", |conn| {
            CategoryService::new(SqliteCategoryRepository::try_new(conn)?).categories_with_counts()
        });
        respond(result, ActionResult::ok)
    }

    pub fn task_stats(&self) -> ActionResult<TaskStats> {
        respond(self.with_tasks("task_stats", |tasks| tasks.stats()), ActionResult::ok)
    }

    fn with_tasks<T>(
        &self,
        action: &'static str,
        f: impl FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> todo_core::RepoResult<T>,
    ) -> Result<T, (&'static str, StoreError)> {
        self.run(action, |conn| {
            let service = TaskService::new(SqliteTaskRepository::try_new(conn)?);
            f(&service)
        })
    }

    fn run<T>(
        &self,
        action: &'static str,
        f: impl FnOnce(&rusqlite::Connection) -> todo_core::RepoResult<T>,
    ) -> Result<T, (&'static str, StoreError)> {
        let started_at = Instant::now();
        let result = self.store.with_connection(f);
        if result.is_ok() {
            debug!(
                "event=action module=actions action={} status=ok duration_ms={}",
                action,
                started_at.elapsed().as_millis()
            );
        }
        result.map_err(|err| (action, err))
    }
}

fn respond<T, U>(
    result: Result<T, (&'static str, StoreError)>,
    on_success: impl FnOnce(T) -> ActionResult<U>,
) -> ActionResult<U> {
    match result {
        Ok(value) => on_success(value),
        Err((action, err)) => failure_for(action, &err),
    }
}

fn failure_for<U>(action: &'static str, err: &StoreError) -> ActionResult<U> {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::NotFound => {
            warn!(
                "event=action module=actions action={} status=rejected kind={:?} error={}",
                action,
                err.kind(),
                err
            );
            ActionResult::failure(err.to_string())
        }
        ErrorKind::Storage => {
            error!(
                "event=action module=actions action={} status=error \
                 error_code=storage_failure error={}",
                action, err
            );
            ActionResult::failure(STORAGE_FAILURE_MESSAGE)
        }
    }
}
