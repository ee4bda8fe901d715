use chrono::NaiveDate;
use readycheck_core::db::open_db_in_memory;
use readycheck_core::model::section::ItemStatus;
use readycheck_core::model::task::TaskPriority;
use readycheck_core::model::user::UserRef;
use readycheck_core::repo::task_repo::SqliteTaskRepository;
use readycheck_core::service::task_service::{TaskDraft, TaskService, TaskServiceError};
use uuid::Uuid;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).unwrap()
}

fn draft(title: &str, priority: TaskPriority, day: u32) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: String::new(),
        priority,
        responsible: "Duty Officer".to_string(),
        due_date: date(day),
        section_id: None,
    }
}

#[test]
fn create_and_get_roundtrip_stamps_attribution() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let creator = UserRef::new("Lt. Moura", "responsible");

    let created = service
        .create_task(&draft("  Update operations map ", TaskPriority::High, 22), &creator)
        .unwrap();

    assert_eq!(created.title, "Update operations map");
    assert_eq!(created.status, ItemStatus::Pending);
    assert_eq!(created.created_by.as_deref(), Some("Lt. Moura"));
    assert!(created.created_at.is_some());

    let loaded = service.get_task(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let creator = UserRef::new("Lt. Moura", "responsible");

    let err = service
        .create_task(&draft("   ", TaskPriority::Low, 22), &creator)
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::InvalidTitle));
}

#[test]
fn listings_are_ordered_by_due_date() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let creator = UserRef::new("Lt. Moura", "responsible");

    service
        .create_task(&draft("Later task", TaskPriority::Medium, 26), &creator)
        .unwrap();
    service
        .create_task(&draft("Earlier task", TaskPriority::Medium, 21), &creator)
        .unwrap();
    service
        .create_task(&draft("Middle task", TaskPriority::Medium, 24), &creator)
        .unwrap();

    let titles: Vec<String> = service
        .list_tasks()
        .unwrap()
        .into_iter()
        .map(|task| task.title)
        .collect();
    assert_eq!(titles, vec!["Earlier task", "Middle task", "Later task"]);
}

#[test]
fn open_and_high_priority_views_filter_done_tasks() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let user = UserRef::new("Lt. Moura", "responsible");

    let urgent = service
        .create_task(&draft("Test station alarm", TaskPriority::High, 21), &user)
        .unwrap();
    let finished = service
        .create_task(&draft("Rehearse ceremony", TaskPriority::High, 22), &user)
        .unwrap();
    service
        .create_task(&draft("Organize storeroom", TaskPriority::Low, 23), &user)
        .unwrap();

    service
        .set_status(finished.id, ItemStatus::Done, &user)
        .unwrap();

    let open: Vec<_> = service.open_tasks().unwrap();
    assert_eq!(open.len(), 2);
    assert!(open.iter().all(|task| task.status != ItemStatus::Done));

    let high: Vec<_> = service.high_priority_tasks().unwrap();
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].id, urgent.id);
}

#[test]
fn update_replaces_fields_and_stamps_editor() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let creator = UserRef::new("Lt. Moura", "responsible");
    let editor = UserRef::new("Sgt. Prado", "responsible");

    let mut task = service
        .create_task(&draft("Check hydrants", TaskPriority::Medium, 23), &creator)
        .unwrap();

    task.description = "cross-check registry against the field".to_string();
    task.priority = TaskPriority::High;
    task.due_date = date(25);

    let updated = service.update_task(&task, &editor).unwrap();
    assert_eq!(updated.priority, TaskPriority::High);
    assert_eq!(updated.due_date, date(25));
    assert_eq!(updated.last_updated_by.as_deref(), Some("Sgt. Prado"));
    assert!(updated.last_updated.is_some());
}

#[test]
fn delete_is_permanent_and_unknown_ids_fail() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::new(&conn));
    let creator = UserRef::new("Lt. Moura", "responsible");

    let task = service
        .create_task(&draft("Inspect ladders", TaskPriority::Medium, 24), &creator)
        .unwrap();

    service.delete_task(task.id).unwrap();
    assert!(service.get_task(task.id).unwrap().is_none());

    let err = service.delete_task(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(_)));
}
