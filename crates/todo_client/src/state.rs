//! Client-side mirror of tasks and categories.
//!
//! # Responsibility
//! - Hold the full task list, the visible subset and local category counts.
//! - Publish every change as one named transition.
//!
//! # Invariants
//! - [`BoardState::transition`] is the only way to mutate the mirror.
//! - Observers see either the state before a transition or after it,
//!   never a partially applied group of changes.
//! - Local counts never go below zero.

use crate::view::ViewMode;
use log::trace;
use todo_core::{Category, Task, TaskId, ALL_CATEGORIES};

/// Immutable view of the mirror at one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    tasks: Vec<Task>,
    visible: Vec<Task>,
    categories: Vec<Category>,
    category_filter: String,
    search_text: String,
    active_query: String,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            visible: Vec::new(),
            categories: Vec::new(),
            category_filter: ALL_CATEGORIES.to_string(),
            search_text: String::new(),
            active_query: String::new(),
        }
    }
}

impl BoardSnapshot {
    /// Every known task, in store order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks currently displayed.
    pub fn visible(&self) -> &[Task] {
        &self.visible
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_filter(&self) -> &str {
        &self.category_filter
    }

    /// Raw search text as typed; may run ahead of [`Self::active_query`].
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Search text the visible list was last computed for.
    pub fn active_query(&self) -> &str {
        &self.active_query
    }

    pub fn view(&self) -> ViewMode {
        ViewMode::resolve(&self.category_filter, &self.active_query)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }
}

/// Mutable draft handed to a transition closure.
pub struct BoardDraft {
    inner: BoardSnapshot,
}

impl BoardDraft {
    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.inner
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.inner.tasks = tasks;
    }

    pub fn set_visible(&mut self, visible: Vec<Task>) {
        self.inner.visible = visible;
    }

    /// Recomputes the visible list from the full list for the active view.
    pub fn refilter_visible(&mut self) {
        let view = self.inner.view();
        self.inner.visible = self
            .inner
            .tasks
            .iter()
            .filter(|task| view.matches(task))
            .cloned()
            .collect();
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.inner.categories = categories;
    }

    pub fn set_category_filter(&mut self, name: impl Into<String>) {
        self.inner.category_filter = name.into();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.inner.search_text = text.into();
    }

    pub fn set_active_query(&mut self, query: impl Into<String>) {
        self.inner.active_query = query.into();
    }

    /// Adds a confirmed new task at the front of the full list, and of the
    /// visible list when it matches the active view.
    pub fn prepend(&mut self, task: Task) {
        if self.inner.view().matches(&task) {
            self.inner.visible.insert(0, task.clone());
        }
        self.inner.tasks.insert(0, task);
    }

    /// Replaces the local copy of `task` with a confirmed one.
    ///
    /// The visible entry is dropped when the task no longer matches the view.
    pub fn reconcile(&mut self, task: Task) {
        let keep_visible = self.inner.view().matches(&task);
        if let Some(slot) = self.inner.visible.iter_mut().find(|t| t.id == task.id) {
            *slot = task.clone();
        }
        if !keep_visible {
            self.inner.visible.retain(|t| t.id != task.id);
        }
        if let Some(slot) = self.inner.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// Removes a task from both lists. Returns the removed copy.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        self.inner.visible.retain(|task| task.id != id);
        let index = self.inner.tasks.iter().position(|task| task.id == id)?;
        Some(self.inner.tasks.remove(index))
    }

    /// Negates `completed` on every local copy of `id`.
    ///
    /// Returns `false` when the task is not mirrored.
    pub fn flip_completed(&mut self, id: TaskId) -> bool {
        let mut found = false;
        for task in self
            .inner
            .tasks
            .iter_mut()
            .chain(self.inner.visible.iter_mut())
            .filter(|task| task.id == id)
        {
            task.completed = !task.completed;
            found = true;
        }
        found
    }

    /// Adds `delta` to the local count of `name`; unknown names are ignored.
    pub fn adjust_count(&mut self, name: &str, delta: i64) {
        if let Some(category) = self
            .inner
            .categories
            .iter_mut()
            .find(|category| category.name == name)
        {
            category.count = category.count.saturating_add_signed(delta);
        }
    }
}

/// Versioned owner of the mirror.
#[derive(Debug, Default)]
pub struct BoardState {
    current: BoardSnapshot,
    revision: u64,
}

impl BoardState {
    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.current
    }

    /// Number of transitions published so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies `f` to a draft copy and publishes it as one revision.
    pub fn transition<R>(&mut self, name: &'static str, f: impl FnOnce(&mut BoardDraft) -> R) -> R {
        let mut draft = BoardDraft {
            inner: self.current.clone(),
        };
        let output = f(&mut draft);
        self.current = draft.inner;
        self.revision += 1;
        trace!(
            "event=transition module=client name={} revision={}",
            name,
            self.revision
        );
        output
    }
}
