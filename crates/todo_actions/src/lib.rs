//! Request/response boundary between the UI and the task store.
//!
//! Every operation returns an [`ActionResult`]; failures never cross this
//! boundary as Rust errors or panics.

mod actions;
pub mod config;
mod result;
pub mod store;

pub use actions::{CreateTaskInput, TodoActions, STORAGE_FAILURE_MESSAGE};
pub use config::AppConfig;
pub use result::ActionResult;
pub use store::{SharedStore, StoreError, StoreLocation};
