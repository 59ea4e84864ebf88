//! Request/response seam between the synchronizer and the action layer.

use todo_actions::{ActionResult, CreateTaskInput, TodoActions};
use todo_core::{Category, Task, TaskId, TaskPatch};

/// Operations the synchronizer needs from the action layer.
///
/// Implementations must report every failure through the envelope.
pub trait TaskGateway {
    fn create_task(&self, input: &CreateTaskInput) -> ActionResult<Task>;
    fn toggle_task(&self, id: TaskId, completed: bool) -> ActionResult<Task>;
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ActionResult<Task>;
    fn delete_task(&self, id: TaskId) -> ActionResult<()>;
    fn list_tasks(&self) -> ActionResult<Vec<Task>>;
    fn list_tasks_by_category(&self, name: &str) -> ActionResult<Vec<Task>>;
    fn search_tasks(&self, query: &str) -> ActionResult<Vec<Task>>;
    fn categories_with_counts(&self) -> ActionResult<Vec<Category>>;
}

impl TaskGateway for TodoActions {
    fn create_task(&self, input: &CreateTaskInput) -> ActionResult<Task> {
        TodoActions::create_task(self, input)
    }

    fn toggle_task(&self, id: TaskId, completed: bool) -> ActionResult<Task> {
        TodoActions::toggle_task(self, id, completed)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ActionResult<Task> {
        TodoActions::update_task(self, id, patch)
    }

    fn delete_task(&self, id: TaskId) -> ActionResult<()> {
        TodoActions::delete_task(self, id)
    }

    fn list_tasks(&self) -> ActionResult<Vec<Task>> {
        TodoActions::list_tasks(self)
    }

    fn list_tasks_by_category(&self, name: &str) -> ActionResult<Vec<Task>> {
        TodoActions::list_tasks_by_category(self, name)
    }

    fn search_tasks(&self, query: &str) -> ActionResult<Vec<Task>> {
        TodoActions::search_tasks(self, query)
    }

    fn categories_with_counts(&self) -> ActionResult<Vec<Category>> {
        TodoActions::categories_with_counts(self)
    }
}

impl<G: TaskGateway + ?Sized> TaskGateway for &G {
    fn create_task(&self, input: &CreateTaskInput) -> ActionResult<Task> {
        (**self).create_task(input)
    }

    fn toggle_task(&self, id: TaskId, completed: bool) -> ActionResult<Task> {
        (**self).toggle_task(id, completed)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> ActionResult<Task> {
        (**self).update_task(id, patch)
    }

    fn delete_task(&self, id: TaskId) -> ActionResult<()> {
        (**self).delete_task(id)
    }

    fn list_tasks(&self) -> ActionResult<Vec<Task>> {
        (**self).list_tasks()
    }

    fn list_tasks_by_category(&self, name: &str) -> ActionResult<Vec<Task>> {
        (**self).list_tasks_by_category(name)
    }

    fn search_tasks(&self, query: &str) -> ActionResult<Vec<Task>> {
        (**self).search_tasks(query)
    }

    fn categories_with_counts(&self) -> ActionResult<Vec<Category>> {
        (**self).categories_with_counts()
    }
}
