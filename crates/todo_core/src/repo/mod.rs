//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to DB transport errors.
//! - Repositories refuse connections that have not been migrated.

pub mod category_repo;
mod error;
mod schema;
pub mod task_repo;

pub use error::{ErrorKind, RepoError, RepoResult};
