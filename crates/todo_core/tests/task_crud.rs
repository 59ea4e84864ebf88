use rusqlite::{params, Connection};
use todo_core::db::migrations::latest_version;
use todo_core::db::open_db_in_memory;
use todo_core::{
    ErrorKind, Priority, RepoError, SqliteTaskRepository, TaskPatch, TaskQuery, TaskRepository,
    TaskService, TaskValidationError,
};

fn service(conn: &Connection) -> TaskService<SqliteTaskRepository<'_>> {
    TaskService::new(SqliteTaskRepository::try_new(conn).unwrap())
}

#[test]
fn create_applies_defaults_and_returns_stored_row() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);

    let created = tasks.create("  write report  ", None, None).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.title, "write report");
    assert!(!created.completed);
    assert_eq!(created.category, "general");
    assert_eq!(created.priority, Priority::Medium);
    assert!(created.created_at > 0);
    assert_eq!(created.updated_at, created.created_at);

    let loaded = tasks.get_task(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_assigns_unique_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);

    let first = tasks.create("one", None, None).unwrap();
    let second = tasks.create("two", None, None).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn create_rejects_blank_title_and_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);

    for title in ["", "   ", "\t\n"] {
        let err = tasks.create(title, Some("work"), None).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(TaskValidationError::EmptyTitle)
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert!(tasks.list_all().unwrap().is_empty());
}

#[test]
fn title_length_boundary_is_200_characters() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);

    let ok = tasks.create(&"a".repeat(200), None, None).unwrap();
    assert_eq!(ok.title.chars().count(), 200);

    let padded = format!("   {}   ", "b".repeat(200));
    assert!(tasks.create(&padded, None, None).is_ok());

    let err = tasks.create(&"a".repeat(201), None, None).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::TitleTooLong { chars: 201, max: 200 })
    ));
    assert_eq!(tasks.list_all().unwrap().len(), 2);
}

#[test]
fn update_changes_only_given_fields_and_refreshes_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let created = tasks
        .create("draft", Some("work"), Some(Priority::Low))
        .unwrap();
    conn.execute(
        "UPDATE tasks SET created_at = 1000, updated_at = 1000 WHERE id = ?1;",
        [created.id],
    )
    .unwrap();

    let patch = TaskPatch {
        priority: Some(Priority::High),
        ..TaskPatch::default()
    };
    let updated = tasks.update(created.id, &patch).unwrap();

    assert_eq!(updated.title, "draft");
    assert_eq!(updated.category, "work");
    assert_eq!(updated.priority, Priority::High);
    assert!(!updated.completed);
    assert_eq!(updated.created_at, 1000);
    assert!(updated.updated_at > 1000);
}

#[test]
fn update_validates_title_and_rejects_empty_patch() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let created = tasks.create("keep me", None, None).unwrap();

    let blank = TaskPatch {
        title: Some("   ".to_string()),
        ..TaskPatch::default()
    };
    assert!(matches!(
        tasks.update(created.id, &blank).unwrap_err(),
        RepoError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert!(matches!(
        tasks.update(created.id, &TaskPatch::default()).unwrap_err(),
        RepoError::Validation(TaskValidationError::EmptyPatch)
    ));
    assert_eq!(tasks.get_task(created.id).unwrap().unwrap().title, "keep me");
}

#[test]
fn update_missing_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);

    let patch = TaskPatch {
        completed: Some(true),
        ..TaskPatch::default()
    };
    let err = tasks.update(4242, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(4242)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn toggle_twice_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let created = tasks.create("flip", None, None).unwrap();

    let once = tasks.toggle(created.id).unwrap();
    assert!(once.completed);
    let twice = tasks.toggle(created.id).unwrap();
    assert!(!twice.completed);

    assert!(matches!(tasks.toggle(9999), Err(RepoError::NotFound(9999))));
}

#[test]
fn set_completed_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let created = tasks.create("done twice", None, None).unwrap();

    assert!(tasks.set_completed(created.id, true).unwrap().completed);
    assert!(tasks.set_completed(created.id, true).unwrap().completed);
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let created = tasks.create("temporary", None, None).unwrap();

    assert!(tasks.delete(created.id).unwrap());
    assert!(!tasks.delete(created.id).unwrap());
    assert!(tasks.get_task(created.id).unwrap().is_none());
    assert!(tasks.list_all().unwrap().is_empty());
}

#[test]
fn list_orders_incomplete_first_then_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let old_open = tasks.create("old open", None, None).unwrap();
    let new_open = tasks.create("new open", None, None).unwrap();
    let newest_done = tasks.create("newest done", None, None).unwrap();
    let old_done = tasks.create("old done", None, None).unwrap();

    set_created_at(&conn, old_open.id, 1_000);
    set_created_at(&conn, new_open.id, 2_000);
    set_created_at(&conn, newest_done.id, 9_000);
    set_created_at(&conn, old_done.id, 500);
    tasks.set_completed(newest_done.id, true).unwrap();
    tasks.set_completed(old_done.id, true).unwrap();

    let ids: Vec<_> = tasks.list_all().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![new_open.id, old_open.id, newest_done.id, old_done.id]);
}

#[test]
fn equal_created_at_falls_back_to_newest_insert() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let first = tasks.create("first", None, None).unwrap();
    let second = tasks.create("second", None, None).unwrap();
    conn.execute("UPDATE tasks SET created_at = 1234;", []).unwrap();

    let ids: Vec<_> = tasks.list_all().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn list_by_category_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let work = tasks.create("ship", Some("work"), None).unwrap();
    tasks.create("relax", Some("Work"), None).unwrap();
    tasks.create("shop", Some("shopping"), None).unwrap();

    let listed = tasks.list_by_category("work").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, work.id);
    assert!(tasks.list_by_category("missing").unwrap().is_empty());
}

#[test]
fn search_matches_case_sensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    let milk = tasks.create("Buy milk", None, None).unwrap();
    tasks.create("buy bread", None, None).unwrap();
    let percent = tasks.create("100% done", None, None).unwrap();

    let hits = tasks.search("Buy").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, milk.id);

    let hits = tasks.search("%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, percent.id);

    assert!(tasks.search("cheese").unwrap().is_empty());
}

#[test]
fn blank_search_equals_list_all() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    tasks.create("a", None, None).unwrap();
    tasks.create("b", Some("work"), None).unwrap();

    assert_eq!(tasks.search("").unwrap(), tasks.list_all().unwrap());
    assert_eq!(tasks.search("   ").unwrap(), tasks.list_all().unwrap());
}

#[test]
fn repository_query_combines_category_and_title_filters() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let target = tasks.create("report draft", Some("work"), None).unwrap();
    tasks.create("report card", Some("personal"), None).unwrap();

    let query = TaskQuery {
        category: Some("work".to_string()),
        title_contains: Some("report".to_string()),
    };
    let found = repo.list_tasks(&query).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, target.id);
}

#[test]
fn stats_count_completed_and_active() {
    let conn = open_db_in_memory().unwrap();
    let tasks = service(&conn);
    assert_eq!(tasks.stats().unwrap().total, 0);

    let a = tasks.create("a", None, None).unwrap();
    tasks.create("b", None, None).unwrap();
    tasks.create("c", None, None).unwrap();
    tasks.toggle(a.id).unwrap();

    let stats = tasks.stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.active, 2);
}

#[test]
fn read_rejects_corrupted_priority() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "INSERT INTO tasks (title, priority, created_at, updated_at) VALUES ('x', 'urgent', 1, 1);",
        [],
    )
    .unwrap();

    let err = service(&conn).list_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "tasks",
            column: "completed"
        })
    ));
}

fn set_created_at(conn: &Connection, id: i64, created_at: i64) {
    conn.execute(
        "UPDATE tasks SET created_at = ?2, updated_at = MAX(updated_at, ?2) WHERE id = ?1;",
        params![id, created_at],
    )
    .unwrap();
}
