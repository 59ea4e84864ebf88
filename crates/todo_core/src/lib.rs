//! Persistence core for the todo application.
//!
//! This crate owns durable task/category state and every invariant about
//! it: title validation, list ordering, and derived category counts.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, ALL_CATEGORIES, DEFAULT_CATEGORIES};
pub use model::task::{
    NewTask, Priority, Task, TaskId, TaskPatch, TaskStats, TaskValidationError, DEFAULT_CATEGORY,
    TITLE_MAX_CHARS,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskQuery, TaskRepository};
pub use repo::{ErrorKind, RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
