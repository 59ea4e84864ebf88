use todo_actions::{
    ActionResult, CreateTaskInput, SharedStore, StoreLocation, TodoActions,
    STORAGE_FAILURE_MESSAGE,
};
use todo_core::{Priority, TaskPatch};

fn count_of(actions: &TodoActions, name: &str) -> u64 {
    actions
        .categories_with_counts()
        .into_result()
        .unwrap()
        .into_iter()
        .find(|category| category.name == name)
        .map(|category| category.count)
        .unwrap()
}

#[test]
fn buy_milk_scenario_through_actions() {
    let actions = TodoActions::in_memory();

    let created = actions.create_task(
        &CreateTaskInput::new("Buy milk")
            .category("shopping")
            .priority("low"),
    );
    assert!(created.success);
    assert_eq!(created.message.as_deref(), Some("Task created successfully"));
    let task = created.data.unwrap();
    assert!(!task.completed);
    assert!(task.id > 0);
    assert_eq!(task.priority, Priority::Low);

    let toggled = actions.toggle_task(task.id, true).into_result().unwrap();
    assert!(toggled.completed);
    let toggled = actions.toggle_task(task.id, false).into_result().unwrap();
    assert!(!toggled.completed);

    let shopping = count_of(&actions, "shopping");
    let general = count_of(&actions, "general");
    let patch = TaskPatch {
        category: Some("general".to_string()),
        ..TaskPatch::default()
    };
    let updated = actions.update_task(task.id, &patch);
    assert!(updated.success);
    assert_eq!(count_of(&actions, "shopping"), shopping - 1);
    assert_eq!(count_of(&actions, "general"), general + 1);

    let deleted = actions.delete_task(task.id);
    assert!(deleted.success);
    assert!(deleted.data.is_none());
    let remaining = actions.list_tasks().into_result().unwrap();
    assert!(remaining.iter().all(|t| t.id != task.id));
}

#[test]
fn validation_errors_are_surfaced_verbatim() {
    let actions = TodoActions::in_memory();

    let blank = actions.create_task(&CreateTaskInput::new("   "));
    assert!(!blank.success);
    assert_eq!(blank.error.as_deref(), Some("Title is required"));

    let too_long = actions.create_task(&CreateTaskInput::new("a".repeat(201)));
    assert!(!too_long.success);
    assert!(too_long.error.unwrap().contains("200 characters or less"));

    let bad_priority = actions.create_task(&CreateTaskInput::new("x").priority("urgent"));
    assert!(!bad_priority.success);
    assert!(bad_priority.error.unwrap().contains("urgent"));

    assert!(actions.list_tasks().into_result().unwrap().is_empty());
}

#[test]
fn missing_task_is_reported_on_update_but_not_on_delete() {
    let actions = TodoActions::in_memory();

    let updated = actions.toggle_task(77, true);
    assert!(!updated.success);
    assert_eq!(updated.error.as_deref(), Some("Task not found: 77"));

    let deleted = actions.delete_task(77);
    assert!(deleted.success);
}

#[test]
fn storage_failures_are_replaced_by_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.db");
    let actions = TodoActions::new(SharedStore::new(StoreLocation::File(path)));

    let listed = actions.list_tasks();
    assert!(!listed.success);
    assert_eq!(listed.error.as_deref(), Some(STORAGE_FAILURE_MESSAGE));

    let created = actions.create_task(&CreateTaskInput::new("still fails"));
    assert_eq!(created.error.as_deref(), Some(STORAGE_FAILURE_MESSAGE));
}

#[test]
fn category_listing_supports_all_sentinel_and_search() {
    let actions = TodoActions::in_memory();
    actions.create_task(&CreateTaskInput::new("Plan sprint").category("work"));
    actions.create_task(&CreateTaskInput::new("Call mom").category("personal"));

    let all = actions.list_tasks_by_category("all").into_result().unwrap();
    assert_eq!(all.len(), 2);
    let work = actions.list_tasks_by_category("work").into_result().unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].title, "Plan sprint");

    let found = actions.search_tasks("mom").into_result().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(actions.search_tasks("").into_result().unwrap(), all);
}

#[test]
fn stats_and_file_store_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");
    let actions = TodoActions::new(SharedStore::new(StoreLocation::File(path)));

    let task = actions
        .create_task(&CreateTaskInput::new("persist me"))
        .into_result()
        .unwrap();
    actions.toggle_task(task.id, true);
    actions.store().close().unwrap();

    let stats = actions.task_stats().into_result().unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.active, 0);
}

#[test]
fn created_task_envelope_serializes_with_wire_names() {
    let actions = TodoActions::in_memory();
    let created = actions.create_task(&CreateTaskInput::new("wire"));
    let json: serde_json::Value = serde_json::from_str(&created.to_json().unwrap()).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["completed"], false);
    assert_eq!(json["data"]["priority"], "medium");
    assert_eq!(json["data"]["category"], "general");
    assert!(json.get("error").is_none());

    let decoded: ActionResult<todo_core::Task> = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, created);
}
