use chrono::{NaiveDate, NaiveTime};
use readycheck_core::db::open_db_in_memory;
use readycheck_core::model::event::EventKind;
use readycheck_core::repo::event_repo::SqliteEventRepository;
use readycheck_core::service::event_service::{EventDraft, EventService, EventServiceError};
use uuid::Uuid;

fn draft(title: &str, kind: EventKind, date: NaiveDate) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: String::new(),
        kind,
        date,
        time: None,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn add_and_list_orders_by_date_then_time() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let mut review = draft("Document review", EventKind::Review, date(2026, 9, 21));
    review.time = NaiveTime::from_hms_opt(14, 0, 0);
    service.add_event(&review).unwrap();

    let mut briefing = draft("Morning briefing", EventKind::Meeting, date(2026, 9, 21));
    briefing.time = NaiveTime::from_hms_opt(8, 0, 0);
    service.add_event(&briefing).unwrap();

    service
        .add_event(&draft("Official inspection", EventKind::Inspection, date(2026, 9, 28)))
        .unwrap();

    let titles: Vec<String> = service
        .list_events()
        .unwrap()
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(
        titles,
        vec!["Morning briefing", "Document review", "Official inspection"]
    );
}

#[test]
fn month_view_uses_half_open_month_range() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    service
        .add_event(&draft("September drill", EventKind::Training, date(2026, 9, 30)))
        .unwrap();
    service
        .add_event(&draft("October retrospective", EventKind::Meeting, date(2026, 10, 1)))
        .unwrap();
    service
        .add_event(&draft("December planning", EventKind::Preparation, date(2026, 12, 15)))
        .unwrap();

    let september = service.month_events(2026, 9).unwrap();
    assert_eq!(september.len(), 1);
    assert_eq!(september[0].title, "September drill");

    let december = service.month_events(2026, 12).unwrap();
    assert_eq!(december.len(), 1);
    assert_eq!(december[0].title, "December planning");
}

#[test]
fn upcoming_skips_past_events_and_caps_results() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    service
        .add_event(&draft("Past rehearsal", EventKind::Training, date(2026, 9, 10)))
        .unwrap();
    service
        .add_event(&draft("Internal inspection", EventKind::Inspection, date(2026, 9, 25)))
        .unwrap();
    service
        .add_event(&draft("Official inspection", EventKind::Inspection, date(2026, 9, 28)))
        .unwrap();

    let upcoming = service.upcoming_events(date(2026, 9, 20), 1).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].title, "Internal inspection");
}

#[test]
fn remove_event_is_permanent_and_unknown_ids_fail() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let event = service
        .add_event(&draft("Internal review", EventKind::Review, date(2026, 9, 22)))
        .unwrap();

    service.remove_event(event.id).unwrap();
    assert!(service.list_events().unwrap().is_empty());

    let err = service.remove_event(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, EventServiceError::EventNotFound(_)));
}

#[test]
fn blank_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::new(&conn));

    let err = service
        .add_event(&draft("   ", EventKind::Meeting, date(2026, 9, 22)))
        .unwrap_err();
    assert!(matches!(err, EventServiceError::InvalidTitle));
}
