use chrono::NaiveDate;
use readycheck_core::blob::FsBlobStore;
use readycheck_core::db::open_db_in_memory;
use readycheck_core::model::section::{ItemStatus, Score, SectionStatus};
use readycheck_core::model::user::UserRef;
use readycheck_core::repo::audit_repo::{AuditRepository, SqliteAuditRepository};
use readycheck_core::repo::section_repo::SqliteSectionRepository;
use readycheck_core::scoring;
use readycheck_core::service::checklist_service::{ChecklistService, ChecklistServiceError};
use readycheck_core::service::evidence_service::{EvidenceService, EvidenceServiceError};
use rusqlite::Connection;

fn checklist_service(conn: &Connection) -> ChecklistService<SqliteSectionRepository<'_>, SqliteAuditRepository<'_>> {
    ChecklistService::new(
        SqliteSectionRepository::try_new(conn).unwrap(),
        SqliteAuditRepository::new(conn),
    )
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 20).unwrap()
}

#[test]
fn seeding_is_one_shot() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);

    let inserted = service.seed_default_checklist().unwrap();
    assert!(inserted > 0);
    assert_eq!(service.seed_default_checklist().unwrap(), 0);

    let sections = service.list_sections().unwrap();
    assert_eq!(sections.len(), inserted);
    assert!(sections.iter().all(|section| !section.items.is_empty()));
    assert!(sections
        .iter()
        .all(|section| section.status == SectionStatus::Pending));
}

#[test]
fn status_edit_cascades_to_progress_log_and_history() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();
    let editor = UserRef::new("Cmdr. Reyes", "administrator");

    let updated = service
        .apply_item_edit(
            "s1",
            "i101",
            ItemStatus::Done,
            Some("verified with the duty crew"),
            &editor,
            today(),
        )
        .unwrap();

    let item = updated.find_item("i101").unwrap();
    assert_eq!(item.status, ItemStatus::Done);
    assert_eq!(item.score, Score::Points(10));
    assert_eq!(item.notes, "verified with the duty crew");
    assert_eq!(updated.status, SectionStatus::InProgress);
    assert_eq!(updated.last_updated_by.as_deref(), Some("Cmdr. Reyes"));

    let audit = SqliteAuditRepository::new(&conn);
    let changes = audit.recent_changes(10).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].section_id, "s1");
    assert_eq!(changes[0].item_id, "i101");
    assert_eq!(changes[0].old_status, ItemStatus::Pending);
    assert_eq!(changes[0].new_status, ItemStatus::Done);
    assert_eq!(changes[0].changed_by, "Cmdr. Reyes");

    let history = audit.progress_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, today());
    let expected = scoring::aggregate_completion(&service.list_sections().unwrap());
    assert_eq!(history[0].percent, expected);
}

#[test]
fn notes_only_edit_leaves_no_audit_trail() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();
    let editor = UserRef::new("Cmdr. Reyes", "administrator");

    service
        .apply_item_edit(
            "s1",
            "i101",
            ItemStatus::Pending,
            Some("still waiting on the bugler"),
            &editor,
            today(),
        )
        .unwrap();

    let audit = SqliteAuditRepository::new(&conn);
    assert!(audit.recent_changes(10).unwrap().is_empty());
    assert!(audit.progress_history().unwrap().is_empty());

    let section = service.get_section("s1").unwrap().unwrap();
    assert_eq!(
        section.find_item("i101").unwrap().notes,
        "still waiting on the bugler"
    );
}

#[test]
fn same_day_completions_share_one_history_row() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();
    let editor = UserRef::new("Cmdr. Reyes", "administrator");

    service
        .apply_item_edit("s1", "i101", ItemStatus::Done, None, &editor, today())
        .unwrap();
    service
        .apply_item_edit("s1", "i102", ItemStatus::Done, None, &editor, today())
        .unwrap();

    let audit = SqliteAuditRepository::new(&conn);
    let history = audit.progress_history().unwrap();
    assert_eq!(history.len(), 1);

    let expected = scoring::aggregate_completion(&service.list_sections().unwrap());
    assert_eq!(history[0].percent, expected);
    assert_eq!(audit.recent_changes(10).unwrap().len(), 2);
}

#[test]
fn stale_item_id_fails_without_persisting_anything() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();
    let editor = UserRef::new("Cmdr. Reyes", "administrator");
    let before = service.get_section("s1").unwrap().unwrap();

    let err = service
        .apply_item_edit("s1", "i999", ItemStatus::Done, Some(""), &editor, today())
        .unwrap_err();
    assert!(matches!(err, ChecklistServiceError::ItemNotFound { .. }));

    let unknown_section = service
        .apply_item_edit("s99", "i101", ItemStatus::Done, None, &editor, today())
        .unwrap_err();
    assert!(matches!(
        unknown_section,
        ChecklistServiceError::SectionNotFound(id) if id == "s99"
    ));

    assert_eq!(service.get_section("s1").unwrap().unwrap(), before);
    let audit = SqliteAuditRepository::new(&conn);
    assert!(audit.recent_changes(10).unwrap().is_empty());
}

#[test]
fn metadata_update_reads_back_persisted_state() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();
    let editor = UserRef::new("Cmdr. Reyes", "administrator");

    let deadline = NaiveDate::from_ymd_opt(2026, 9, 26);
    let updated = service
        .update_metadata("s3", "Archive Sergeant", deadline, &editor)
        .unwrap();

    assert_eq!(updated.responsible, "Archive Sergeant");
    assert_eq!(updated.deadline, deadline);
    assert_eq!(updated.last_updated_by.as_deref(), Some("Cmdr. Reyes"));
}

#[test]
fn evidence_upload_stores_blob_and_appends_reference() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();

    let blob_root = tempfile::tempdir().unwrap();
    let evidence = EvidenceService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        FsBlobStore::new(blob_root.path()),
    );
    let uploader = UserRef::new("Sgt. Prado", "responsible");

    let now_ms = 1_790_000_000_000_i64;
    let section = evidence
        .upload_evidence("s1", "i101", "formation.jpg", b"jpeg-bytes", &uploader, now_ms)
        .unwrap();

    let item = section.find_item("i101").unwrap();
    assert_eq!(item.evidences.len(), 1);
    assert_eq!(item.evidences[0].name, "formation.jpg");
    assert_eq!(item.evidences[0].uploaded_by.as_deref(), Some("Sgt. Prado"));
    assert_eq!(item.evidences[0].uploaded_at, Some(now_ms));

    let url = item.evidences[0].url.clone().unwrap();
    assert_eq!(url, format!("evidences/s1/i101/{now_ms}_formation.jpg"));
    let stored = std::fs::read(blob_root.path().join(&url)).unwrap();
    assert_eq!(stored, b"jpeg-bytes");

    // Scores and progress are untouched by evidence.
    assert_eq!(section.progress, 0);
    assert_eq!(item.score, Score::Points(0));

    let twice = evidence
        .upload_evidence("s1", "i101", "close-up.jpg", b"more-bytes", &uploader, now_ms + 1)
        .unwrap();
    let evidences = &twice.find_item("i101").unwrap().evidences;
    assert_eq!(evidences.len(), 2);
    assert_eq!(evidences[0].name, "formation.jpg");
    assert_eq!(evidences[1].name, "close-up.jpg");
}

#[test]
fn evidence_upload_fails_before_writing_for_stale_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = checklist_service(&conn);
    service.seed_default_checklist().unwrap();

    let blob_root = tempfile::tempdir().unwrap();
    let evidence = EvidenceService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        FsBlobStore::new(blob_root.path()),
    );
    let uploader = UserRef::new("Sgt. Prado", "responsible");

    let err = evidence
        .upload_evidence("s1", "i999", "orphan.jpg", b"bytes", &uploader, 1)
        .unwrap_err();
    assert!(matches!(err, EvidenceServiceError::ItemNotFound { .. }));

    assert!(std::fs::read_dir(blob_root.path()).unwrap().next().is_none());
}
