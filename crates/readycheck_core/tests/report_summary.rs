use chrono::NaiveDate;
use readycheck_core::db::open_db_in_memory;
use readycheck_core::model::section::{InspectionItem, InspectionSection, ItemStatus};
use readycheck_core::model::user::UserRef;
use readycheck_core::report::{build_readiness_report, days_remaining, stats_by_responsible};
use readycheck_core::repo::audit_repo::SqliteAuditRepository;
use readycheck_core::repo::section_repo::SqliteSectionRepository;
use readycheck_core::scoring::recompute;
use readycheck_core::service::checklist_service::ChecklistService;
use readycheck_core::service::report_service::ReportService;

fn section(id: &str, responsible: &str, statuses: &[(&str, ItemStatus)]) -> InspectionSection {
    let mut section = InspectionSection::new(id, format!("Section {id}"));
    section.responsible = responsible.to_string();
    section.items = statuses
        .iter()
        .map(|(item_id, status)| {
            let mut item = InspectionItem::new(*item_id, format!("requirement {item_id}"));
            item.status = *status;
            item
        })
        .collect();
    recompute(section)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).unwrap()
}

#[test]
fn days_remaining_is_signed() {
    assert_eq!(days_remaining(date(20), date(28)), 8);
    assert_eq!(days_remaining(date(28), date(28)), 0);
    assert_eq!(days_remaining(date(28), date(20)), -8);
}

#[test]
fn responsible_stats_group_sort_and_skip_blank() {
    let sections = vec![
        section(
            "s1",
            "Operations Officer",
            &[("i1", ItemStatus::Done), ("i2", ItemStatus::Pending)],
        ),
        section("s2", "", &[("i3", ItemStatus::Done)]),
        section(
            "s3",
            "Ceremony Sergeant",
            &[("i4", ItemStatus::NotApplicable), ("i5", ItemStatus::Done)],
        ),
        section("s4", "Operations Officer", &[("i6", ItemStatus::Done)]),
    ];

    let stats = stats_by_responsible(&sections);
    assert_eq!(stats.len(), 2);

    assert_eq!(stats[0].responsible, "Ceremony Sergeant");
    assert_eq!(stats[0].counts.not_applicable, 1);
    assert_eq!(stats[0].progress, 100);

    assert_eq!(stats[1].responsible, "Operations Officer");
    assert_eq!(stats[1].counts.done, 2);
    assert_eq!(stats[1].counts.pending, 1);
    assert_eq!(stats[1].progress, 67);
}

#[test]
fn readiness_report_assembles_consistent_metrics() {
    let sections = vec![
        section(
            "s1",
            "Operations Officer",
            &[("i1", ItemStatus::Done), ("i2", ItemStatus::NotApplicable)],
        ),
        section(
            "s2",
            "Ceremony Sergeant",
            &[("i3", ItemStatus::InProgress), ("i4", ItemStatus::Pending)],
        ),
    ];

    let report = build_readiness_report(&sections, date(20), Some(date(28)));

    assert_eq!(report.generated_on, date(20));
    assert_eq!(report.days_remaining, Some(8));
    // Eligible scores: 10, 5, 0 -> mean 5.0.
    assert_eq!(report.average_score, 5.0);
    // 1 done of 3 eligible -> 33.
    assert_eq!(report.completion_percent, 33);
    assert_eq!(report.total_sections, 2);
    assert_eq!(report.completed_sections, 1);
    assert_eq!(report.summary.counts.total(), 4);
    assert_eq!(report.summary.progress, 33);
    assert_eq!(report.by_responsible.len(), 2);

    let undated = build_readiness_report(&sections, date(20), None);
    assert_eq!(undated.days_remaining, None);
    assert_eq!(undated.inspection_date, None);
}

#[test]
fn report_service_reads_persisted_state_and_audit_trail() {
    let conn = open_db_in_memory().unwrap();
    let checklist = ChecklistService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        SqliteAuditRepository::new(&conn),
    );
    checklist.seed_default_checklist().unwrap();

    let editor = UserRef::new("Cmdr. Reyes", "administrator");
    checklist
        .apply_item_edit("s1", "i101", ItemStatus::Done, None, &editor, date(20))
        .unwrap();
    checklist
        .apply_item_edit("s2", "i203", ItemStatus::InProgress, None, &editor, date(20))
        .unwrap();

    let reports = ReportService::new(
        SqliteSectionRepository::try_new(&conn).unwrap(),
        SqliteAuditRepository::new(&conn),
    );

    let summary = reports.status_summary().unwrap();
    assert_eq!(summary.counts.done, 1);
    assert_eq!(summary.counts.in_progress, 1);

    let report = reports.readiness_report(date(20), Some(date(28))).unwrap();
    assert_eq!(report.summary.counts.done, 1);
    assert_eq!(report.days_remaining, Some(8));
    assert!(report.average_score > 0.0);

    let history = reports.progress_history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, date(20));

    let changes = reports.recent_changes(1).unwrap();
    assert_eq!(changes.len(), 1);
    // Newest first: the in-progress transition came last.
    assert_eq!(changes[0].new_status, ItemStatus::InProgress);

    let by_responsible = reports.stats_by_responsible().unwrap();
    assert!(!by_responsible.is_empty());
}
