//! Edit form state for a single task.
//!
//! The form never mutates the mirror itself. The synchronizer reconciles
//! the list only after the store confirms the edit.

use todo_core::{Priority, Task, TaskId, TaskPatch};

/// Lifecycle of one edit submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStatus {
    Idle,
    Pending,
    Failed(String),
    Succeeded,
}

/// Editable fields of a task plus submission state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    task_id: TaskId,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    status: EditStatus,
}

impl EditForm {
    /// Opens a form pre-filled from `task`.
    pub fn open(task: &Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            category: task.category.clone(),
            priority: task.priority,
            status: EditStatus::Idle,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn status(&self) -> &EditStatus {
        &self.status
    }

    /// The form stays open until an edit succeeds.
    pub fn is_open(&self) -> bool {
        self.status != EditStatus::Succeeded
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            EditStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Marks the form pending and returns the patch to submit.
    pub fn begin_submit(&mut self) -> TaskPatch {
        self.status = EditStatus::Pending;
        TaskPatch {
            title: Some(self.title.clone()),
            completed: None,
            category: Some(self.category.clone()),
            priority: Some(self.priority),
        }
    }

    pub(crate) fn finish(&mut self, outcome: Result<(), String>) {
        self.status = match outcome {
            Ok(()) => EditStatus::Succeeded,
            Err(message) => EditStatus::Failed(message),
        };
    }
}
