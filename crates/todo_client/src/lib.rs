//! Client-side state synchronization for the todo UI.
//!
//! Keeps an in-memory mirror of tasks and categories consistent with the
//! store while giving immediate feedback for toggles. All store access
//! goes through a [`TaskGateway`].

pub mod confirm;
pub mod deferred;
pub mod edit;
pub mod gateway;
pub mod optimistic;
pub mod state;
pub mod status;
pub mod sync;
pub mod view;

pub use confirm::ConfirmGate;
pub use deferred::{DeferredQuery, QueryTicket, DEFAULT_QUIET_PERIOD};
pub use edit::{EditForm, EditStatus};
pub use gateway::TaskGateway;
pub use optimistic::{OptimisticUpdate, PendingToggle};
pub use state::{BoardDraft, BoardSnapshot, BoardState};
pub use status::{StatusLine, STATUS_CLEAR_DELAY};
pub use sync::{DeleteOutcome, Synchronizer};
pub use view::ViewMode;
