use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    NewTask, RepoError, SqliteTaskRepository, TaskPatch, TaskService, TaskValidationError,
};
use uuid::Uuid;

#[test]
fn create_then_list_shows_new_task_first() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    service.create_task(&NewTask::new("older", None)).unwrap();
    let created = service
        .create_task(&NewTask::new("newer", Some("details".to_string())))
        .unwrap();

    let tasks = service.list_tasks().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0], created);
}

#[test]
fn create_with_empty_title_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let err = service.create_task(&NewTask::new("", None)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert!(service.list_tasks().unwrap().is_empty());
}

#[test]
fn get_missing_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let id = Uuid::new_v4();
    let err = service.get_task(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn update_completed_is_visible_on_next_get() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service.create_task(&NewTask::new("toggle me", None)).unwrap();
    let updated = service
        .update_task(created.id, &TaskPatch::completed(true))
        .unwrap();
    assert!(updated.completed);
    assert!(updated.updated_at >= created.updated_at);

    let fetched = service.get_task(created.id).unwrap();
    assert!(fetched.completed);
    assert_eq!(fetched.created_at, created.created_at);
}

#[test]
fn update_missing_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let err = service
        .update_task(Uuid::new_v4(), &TaskPatch::completed(true))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn update_with_blank_title_keeps_stored_record() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service.create_task(&NewTask::new("stable", None)).unwrap();
    let patch = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    let err = service.update_task(created.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(service.get_task(created.id).unwrap(), created);
}

#[test]
fn toggle_flips_completion_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service.create_task(&NewTask::new("flip", None)).unwrap();
    assert!(service.toggle_task(created.id).unwrap().completed);
    assert!(!service.toggle_task(created.id).unwrap().completed);
}

#[test]
fn delete_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));

    let created = service.create_task(&NewTask::new("bye", None)).unwrap();
    service.delete_task(created.id).unwrap();

    assert!(matches!(
        service.get_task(created.id).unwrap_err(),
        RepoError::NotFound(_)
    ));
    assert!(matches!(
        service.delete_task(created.id).unwrap_err(),
        RepoError::NotFound(_)
    ));
}
