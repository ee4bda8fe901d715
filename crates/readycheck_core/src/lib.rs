//! Core domain logic for ReadyCheck, an inspection-readiness tracker.
//! This crate is the single source of truth for checklist scoring invariants.

pub mod blob;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod scoring;
pub mod service;
pub mod template;

pub use blob::{BlobError, BlobStore, FsBlobStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::audit::{ChangeLogEntry, ProgressSnapshot};
pub use model::event::{CalendarEvent, EventId, EventKind};
pub use model::section::{
    EvidenceRef, InspectionItem, InspectionSection, InvalidStatusError, ItemId, ItemStatus, Score,
    SectionId, SectionStatus,
};
pub use model::task::{ActionTask, TaskId, TaskPriority};
pub use model::user::UserRef;
pub use report::{ReadinessReport, ResponsibleStats, StatusSummary};
pub use repo::audit_repo::{AuditRepository, SqliteAuditRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::section_repo::{SectionRepoError, SectionRepository, SqliteSectionRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use scoring::{EngineError, StatusCounts};
pub use service::checklist_service::{ChecklistService, ChecklistServiceError};
pub use service::event_service::{EventDraft, EventService};
pub use service::evidence_service::{EvidenceService, EvidenceServiceError};
pub use service::report_service::ReportService;
pub use service::task_service::{TaskDraft, TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
