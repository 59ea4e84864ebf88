//! Domain model for tasks and categories.
//!
//! # Responsibility
//! - Define the records exchanged between store, action layer and client.
//! - Own title validation rules shared by create and update paths.
//!
//! # Invariants
//! - A persisted `Task` always carries a store-assigned positive `id`.
//! - Category counts are derived, never stored.

pub mod category;
pub mod task;
