//! Category use-case service.

use crate::model::category::Category;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoResult;

/// Read-only facade over category storage.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns all categories with live task counts, ordered by name.
    pub fn categories_with_counts(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_with_counts()
    }
}
