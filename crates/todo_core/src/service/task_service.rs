//! Task use-case service.
//!
//! # Responsibility
//! - Validate and normalize caller input before persistence.
//! - Return full stored rows (read back after every write).
//!
//! # Invariants
//! - Returned tasks always carry store-generated fields (`id`, timestamps).
//! - A blank search query behaves exactly like listing everything.

use crate::model::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStats};
use crate::repo::task_repo::{TaskQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every task, incomplete first, newest first within each group.
    pub fn list_all(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(&TaskQuery::all())
    }

    /// Lists tasks whose category equals `name` exactly.
    pub fn list_by_category(&self, name: &str) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(&TaskQuery::by_category(name))
    }

    /// Lists tasks whose title contains `query`.
    ///
    /// The query is matched as given; only an all-whitespace query is
    /// treated as "no filter".
    pub fn search(&self, query: &str) -> RepoResult<Vec<Task>> {
        if query.trim().is_empty() {
            return self.list_all();
        }
        self.repo.list_tasks(&TaskQuery::search(query))
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Creates a task and returns the stored row.
    ///
    /// # Contract
    /// - `category` defaults to `general`, `priority` to `medium`.
    /// - `completed` starts as `false`.
    pub fn create(
        &self,
        title: &str,
        category: Option<&str>,
        priority: Option<Priority>,
    ) -> RepoResult<Task> {
        let draft = NewTask::new(title, category, priority)?;
        let id = self.repo.create_task(&draft)?;
        debug!("event=task_create module=service status=ok task_id={id}");
        self.read_back(id, "created task not found in read-back")
    }

    /// Applies a partial update and returns the post-update row.
    pub fn update(&self, id: TaskId, patch: &TaskPatch) -> RepoResult<Task> {
        self.repo.update_task(id, patch)?;
        self.read_back(id, "updated task not found in read-back")
    }

    /// Sets the completion flag explicitly.
    ///
    /// Re-applying the same value is idempotent apart from `updated_at`.
    pub fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<Task> {
        let patch = TaskPatch {
            completed: Some(completed),
            ..TaskPatch::default()
        };
        self.update(id, &patch)
    }

    /// Flips the completion flag and returns the post-update row.
    pub fn toggle(&self, id: TaskId) -> RepoResult<Task> {
        self.repo.toggle_task(id)?;
        self.read_back(id, "toggled task not found in read-back")
    }

    /// Deletes a task; a missing id is not an error.
    ///
    /// Returns whether a row was actually removed.
    pub fn delete(&self, id: TaskId) -> RepoResult<bool> {
        let removed = self.repo.delete_task(id)?;
        if !removed {
            warn!("event=task_delete module=service status=noop task_id={id}");
        }
        Ok(removed)
    }

    /// Returns total/completed/active counters.
    pub fn stats(&self) -> RepoResult<TaskStats> {
        self.repo.task_stats()
    }

    fn read_back(&self, id: TaskId, details: &'static str) -> RepoResult<Task> {
        self.repo
            .get_task(id)?
            .ok_or_else(|| RepoError::InvalidData(details.to_string()))
    }
}
