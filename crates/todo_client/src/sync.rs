//! Client state synchronizer.
//!
//! # Responsibility
//! - Drive actions through a [`TaskGateway`] and reconcile the mirror with
//!   confirmed results.
//! - Apply speculative toggles immediately and revert them on failure.
//! - Coalesce search input and discard stale search results.
//!
//! # Invariants
//! - Every mirror mutation runs inside a named transition.
//! - A failed action leaves the mirror exactly as the protocol prescribes:
//!   toggles are reverted, everything else is untouched.
//! - Failures are logged and recorded in `last_error`; nothing propagates.

use crate::confirm::ConfirmGate;
use crate::deferred::{DeferredQuery, QueryTicket};
use crate::edit::EditForm;
use crate::gateway::TaskGateway;
use crate::optimistic::{OptimisticUpdate, PendingToggle};
use crate::state::{BoardSnapshot, BoardState};
use crate::status::StatusLine;
use log::{debug, warn};
use std::time::{Duration, Instant};
use todo_actions::{ActionResult, CreateTaskInput};
use todo_core::{Task, TaskId, ALL_CATEGORIES};

const CREATE_PENDING_MESSAGE: &str = "Adding task...";
const CREATE_DONE_MESSAGE: &str = "Task added";

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation gate; nothing was sent.
    Cancelled,
    Deleted,
    Failed(String),
}

/// Mirror of the task store driven by user actions.
pub struct Synchronizer<G: TaskGateway> {
    gateway: G,
    state: BoardState,
    search: DeferredQuery,
    status: StatusLine,
    last_error: Option<String>,
}

impl<G: TaskGateway> Synchronizer<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: BoardState::default(),
            search: DeferredQuery::default(),
            status: StatusLine::default(),
            last_error: None,
        }
    }

    /// Overrides how long search input must be quiet before it is issued.
    pub fn with_search_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.search = DeferredQuery::new(quiet_period);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        self.state.snapshot()
    }

    pub fn revision(&self) -> u64 {
        self.state.revision()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.text()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Advances time-based state (status message expiry).
    pub fn tick(&mut self, now: Instant) {
        self.status.tick(now);
    }

    /// Loads all tasks and category counts from the store.
    ///
    /// Returns `false` and keeps the current mirror when either call fails.
    pub fn load(&mut self) -> bool {
        let tasks = self.gateway.list_tasks();
        let categories = self.gateway.categories_with_counts();
        let (tasks, categories) = match (tasks.into_result(), categories.into_result()) {
            (Ok(tasks), Ok(categories)) => (tasks, categories),
            (Err(err), _) | (_, Err(err)) => {
                self.record_failure("load", err);
                return false;
            }
        };

        self.state.transition("load", |draft| {
            draft.set_tasks(tasks);
            draft.set_categories(categories);
            draft.refilter_visible();
        });
        true
    }

    /// Creates a task. Nothing is inserted locally before confirmation.
    pub fn create(&mut self, input: &CreateTaskInput, now: Instant) -> Option<Task> {
        self.status.show(CREATE_PENDING_MESSAGE, now);

        match self.gateway.create_task(input).into_result() {
            Ok(task) => {
                self.state.transition("create:confirm", |draft| {
                    draft.adjust_count(&task.category, 1);
                    draft.prepend(task.clone());
                });
                self.status.show(CREATE_DONE_MESSAGE, now);
                self.last_error = None;
                Some(task)
            }
            Err(err) => {
                self.status.clear();
                self.record_failure("create", err);
                None
            }
        }
    }

    /// Flips the local copy immediately and returns the pending toggle.
    ///
    /// Returns `None` when `id` is not mirrored.
    pub fn begin_toggle(&mut self, id: TaskId) -> Option<PendingToggle> {
        let completed = !self.state.snapshot().task(id)?.completed;
        let update = OptimisticUpdate::FlipCompleted(id);
        self.state
            .transition("toggle:optimistic", |draft| update.apply(draft));
        Some(PendingToggle {
            id,
            completed,
            update,
        })
    }

    /// Confirms or reverts a toggle started with [`Self::begin_toggle`].
    pub fn finish_toggle(&mut self, pending: PendingToggle, result: ActionResult<Task>) -> bool {
        match result.into_result() {
            Ok(task) => {
                self.state
                    .transition("toggle:confirm", |draft| draft.reconcile(task));
                true
            }
            Err(err) => {
                // Same transform again: a flip is its own inverse.
                self.state
                    .transition("toggle:revert", |draft| pending.update.apply(draft));
                self.record_failure("toggle", err);
                false
            }
        }
    }

    /// Optimistically toggles `id` and settles it against the store.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(pending) = self.begin_toggle(id) else {
            return false;
        };
        let result = self.gateway.toggle_task(pending.id, pending.completed);
        self.finish_toggle(pending, result)
    }

    /// Opens an edit form for a mirrored task.
    pub fn open_edit(&self, id: TaskId) -> Option<EditForm> {
        self.state.snapshot().task(id).map(EditForm::open)
    }

    /// Submits `form`; the mirror changes only after confirmation.
    pub fn submit_edit(&mut self, form: &mut EditForm) -> bool {
        let patch = form.begin_submit();
        let result = self.gateway.update_task(form.task_id(), &patch);
        self.finish_edit(form, result)
    }

    /// Settles an edit submission with the store's response.
    pub fn finish_edit(&mut self, form: &mut EditForm, result: ActionResult<Task>) -> bool {
        match result.into_result() {
            Ok(task) => {
                let previous_category = self
                    .state
                    .snapshot()
                    .task(task.id)
                    .map(|local| local.category.clone());
                self.state.transition("edit:confirm", |draft| {
                    if let Some(previous) = previous_category.filter(|p| *p != task.category) {
                        draft.adjust_count(&previous, -1);
                        draft.adjust_count(&task.category, 1);
                    }
                    draft.reconcile(task);
                });
                form.finish(Ok(()));
                true
            }
            Err(err) => {
                form.finish(Err(err.clone()));
                self.record_failure("edit", err);
                false
            }
        }
    }

    /// Deletes `id` after the gate confirms. No speculative removal.
    pub fn delete(&mut self, id: TaskId, gate: &mut impl ConfirmGate) -> DeleteOutcome {
        let prompt = match self.state.snapshot().task(id) {
            Some(task) => format!("Delete \"{}\"?", task.title),
            None => "Delete this task?".to_string(),
        };
        if !gate.confirm(&prompt) {
            return DeleteOutcome::Cancelled;
        }

        let result = self.gateway.delete_task(id);
        if !result.success {
            let err = result.error.unwrap_or_else(|| "delete failed".to_string());
            self.record_failure("delete", err.clone());
            return DeleteOutcome::Failed(err);
        }

        self.state.transition("delete:confirm", |draft| {
            if let Some(removed) = draft.remove(id) {
                draft.adjust_count(&removed.category, -1);
            }
        });
        DeleteOutcome::Deleted
    }

    /// Switches the category filter and clears any search.
    ///
    /// The filter, the cleared search and the filtered list are published
    /// together. When the lookup fails the previous view is kept as is.
    pub fn set_category_filter(&mut self, name: &str) -> bool {
        let tasks = match self.gateway.list_tasks_by_category(name).into_result() {
            Ok(tasks) => tasks,
            Err(err) => {
                self.record_failure("filter", err);
                return false;
            }
        };

        self.search.reset();
        self.state.transition("filter:select", |draft| {
            draft.set_category_filter(name);
            draft.set_search_text("");
            draft.set_active_query("");
            draft.set_visible(tasks);
        });
        true
    }

    /// Records a keystroke; the raw text is visible immediately.
    pub fn set_search_text(&mut self, text: &str, now: Instant) {
        self.search.input(text, now);
        self.state
            .transition("search:input", |draft| draft.set_search_text(text));
    }

    /// Releases the settled search input, if any.
    pub fn begin_search(&mut self, now: Instant) -> Option<QueryTicket> {
        self.search.poll(now)
    }

    /// Runs the lookup for `ticket`: search when non-blank, otherwise the
    /// active category filter.
    pub fn fetch_search(&self, ticket: &QueryTicket) -> ActionResult<Vec<Task>> {
        if ticket.text().trim().is_empty() {
            let filter = self.state.snapshot().category_filter();
            let filter = if filter.is_empty() { ALL_CATEGORIES } else { filter };
            self.gateway.list_tasks_by_category(filter)
        } else {
            self.gateway.search_tasks(ticket.text())
        }
    }

    /// Applies search results unless newer input has arrived since `ticket`.
    pub fn finish_search(&mut self, ticket: &QueryTicket, result: ActionResult<Vec<Task>>) -> bool {
        if !self.search.is_current(ticket) {
            debug!(
                "event=search_result module=client status=stale generation={}",
                ticket.generation()
            );
            return false;
        }

        match result.into_result() {
            Ok(tasks) => {
                let query = ticket.text().to_string();
                self.state.transition("search:results", |draft| {
                    draft.set_active_query(query);
                    draft.set_visible(tasks);
                });
                true
            }
            Err(err) => {
                self.record_failure("search", err);
                false
            }
        }
    }

    /// Issues the settled search, if one is due, and applies its results.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        let Some(ticket) = self.begin_search(now) else {
            return false;
        };
        let result = self.fetch_search(&ticket);
        self.finish_search(&ticket, result)
    }

    fn record_failure(&mut self, action: &'static str, err: String) {
        warn!(
            "event=sync module=client action={} status=error error={}",
            action, err
        );
        self.last_error = Some(err);
    }
}
