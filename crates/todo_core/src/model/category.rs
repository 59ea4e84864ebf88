//! Category domain model.
//!
//! Categories are seeded once by migration and are read-only afterwards.
//! Tasks reference them by name without a foreign key.

use serde::{Deserialize, Serialize};

/// Name and color of every category seeded at store initialization.
pub const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("general", "#6366f1"),
    ("work", "#dc2626"),
    ("personal", "#059669"),
    ("shopping", "#d97706"),
];

/// Sentinel filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Category with the live number of tasks whose `category` equals `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
    pub count: u64,
}
