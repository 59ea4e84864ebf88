//! Display mode selection for the visible task list.

use todo_core::{Task, ALL_CATEGORIES};

/// What the visible list currently shows.
///
/// A non-empty search always wins over the category filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Category(String),
    Search(String),
}

impl ViewMode {
    pub fn resolve(category_filter: &str, active_query: &str) -> Self {
        if active_query.trim().is_empty() {
            Self::Category(category_filter.to_string())
        } else {
            Self::Search(active_query.to_string())
        }
    }

    /// Mirrors the store-side filter for a single task.
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Category(name) => name == ALL_CATEGORIES || task.category == *name,
            Self::Search(query) => task.title.contains(query.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewMode;
    use todo_core::{Priority, Task};

    fn task(title: &str, category: &str) -> Task {
        Task {
            id: 1,
            title: title.to_string(),
            completed: false,
            category: category.to_string(),
            priority: Priority::Medium,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn blank_query_falls_back_to_category_filter() {
        assert_eq!(
            ViewMode::resolve("work", "  "),
            ViewMode::Category("work".to_string())
        );
        assert_eq!(
            ViewMode::resolve("work", "milk"),
            ViewMode::Search("milk".to_string())
        );
    }

    #[test]
    fn matches_follows_store_semantics() {
        let milk = task("Buy milk", "shopping");
        assert!(ViewMode::Category("all".to_string()).matches(&milk));
        assert!(ViewMode::Category("shopping".to_string()).matches(&milk));
        assert!(!ViewMode::Category("Shopping".to_string()).matches(&milk));
        assert!(ViewMode::Search("milk".to_string()).matches(&milk));
        assert!(!ViewMode::Search("Milk".to_string()).matches(&milk));
    }
}
