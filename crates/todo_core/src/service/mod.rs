//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the action layer decoupled from storage details.

pub mod category_service;
pub mod task_service;
