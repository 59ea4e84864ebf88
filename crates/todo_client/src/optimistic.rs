//! Speculative updates applied before the store confirms them.
//!
//! An update is reverted by applying it a second time, so every variant
//! must be its own inverse. Only binary fields qualify.

use crate::state::BoardDraft;
use todo_core::TaskId;

/// Self-inverse speculative change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimisticUpdate {
    /// Negate `completed` on the mirrored task.
    FlipCompleted(TaskId),
}

impl OptimisticUpdate {
    /// Applies the update. Applying it twice restores the original state.
    pub fn apply(self, draft: &mut BoardDraft) -> bool {
        match self {
            Self::FlipCompleted(id) => draft.flip_completed(id),
        }
    }
}

/// A toggle whose optimistic flip is visible but not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pending toggle must be finished to confirm or revert it"]
pub struct PendingToggle {
    pub(crate) id: TaskId,
    pub(crate) completed: bool,
    pub(crate) update: OptimisticUpdate,
}

impl PendingToggle {
    pub fn task_id(&self) -> TaskId {
        self.id
    }

    /// Completion value sent to the store.
    pub fn completed(&self) -> bool {
        self.completed
    }
}
