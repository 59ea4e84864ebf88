//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its write-side inputs.
//! - Validate and normalize titles before they reach storage.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `title` is trimmed, non-empty and at most [`TITLE_MAX_CHARS`] characters.
//! - `updated_at >= created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned task identifier.
pub type TaskId = i64;

/// Maximum title length, counted in characters after trimming.
pub const TITLE_MAX_CHARS: usize = 200;

/// Category used when the caller does not provide one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Task urgency marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Returns the lowercase storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TaskValidationError::InvalidPriority(other.to_string())),
        }
    }
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub category: String,
    pub priority: Priority,
    /// Unix epoch milliseconds, generated by the store.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every successful update.
    pub updated_at: i64,
}

/// Validation failures for task writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Title exceeds the character limit after trimming.
    TitleTooLong { chars: usize, max: usize },
    /// Priority label is not one of `low|medium|high`.
    InvalidPriority(String),
    /// Update carries no field to change.
    EmptyPatch,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title is required"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "Title must be {max} characters or less (got {chars})")
            }
            Self::InvalidPriority(value) => {
                write!(f, "Invalid priority `{value}`; expected low|medium|high")
            }
            Self::EmptyPatch => write!(f, "Update must change at least one field"),
        }
    }
}

impl Error for TaskValidationError {}

/// Trims and validates a task title.
///
/// Returns the trimmed title that should be persisted.
pub fn normalize_title(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    let chars = trimmed.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(TaskValidationError::TitleTooLong {
            chars,
            max: TITLE_MAX_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional category, falling back to [`DEFAULT_CATEGORY`].
///
/// Category names are case-sensitive, so only surrounding whitespace is
/// removed.
pub fn normalize_category(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Validated input for inserting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub category: String,
    pub priority: Priority,
}

impl NewTask {
    /// Builds a validated insert request, applying category/priority defaults.
    pub fn new(
        title: &str,
        category: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            title: normalize_title(title)?,
            category: normalize_category(category),
            priority: priority.unwrap_or_default(),
        })
    }
}

/// Partial update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.completed.is_none()
            && self.category.is_none()
            && self.priority.is_none()
    }

    /// Returns a copy with title/category normalized.
    ///
    /// # Errors
    /// - `EmptyPatch` when nothing would change.
    /// - Title errors when `title` is present and invalid.
    pub fn validated(&self) -> Result<Self, TaskValidationError> {
        if self.is_empty() {
            return Err(TaskValidationError::EmptyPatch);
        }
        let title = match self.title.as_deref() {
            Some(raw) => Some(normalize_title(raw)?),
            None => None,
        };
        Ok(Self {
            title,
            completed: self.completed,
            category: self
                .category
                .as_deref()
                .map(|value| normalize_category(Some(value))),
            priority: self.priority,
        })
    }

    /// Applies this patch to an in-memory task copy.
    ///
    /// Timestamps are left untouched; only the store refreshes them.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(category) = &self.category {
            task.category = category.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

/// Aggregate counters over the tasks table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub active: u64,
}
