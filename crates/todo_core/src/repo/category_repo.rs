//! Category repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Every seeded category is returned, including those with zero tasks.
//! - Counts match `tasks.category = categories.name` exactly (case-sensitive).
//! - Results are ordered by name ascending.

use super::schema::ensure_table_ready;
use super::task_repo::count_to_u64;
use super::RepoResult;
use crate::model::category::Category;
use rusqlite::Connection;

/// Repository interface for category reads.
pub trait CategoryRepository {
    /// Returns every category joined with its live task count.
    fn list_with_counts(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "categories", &["id", "name", "color"])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_with_counts(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.name AS name,
                c.color AS color,
                COUNT(t.id) AS task_count
             FROM categories c
             LEFT JOIN tasks t ON t.category = c.name
             GROUP BY c.id, c.name, c.color
             ORDER BY c.name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            let count: i64 = row.get("task_count")?;
            categories.push(Category {
                name: row.get("name")?,
                color: row.get("color")?,
                count: count_to_u64(count, "categories.task_count")?,
            });
        }
        Ok(categories)
    }
}
