//! Reporting use-case service.
//!
//! # Responsibility
//! - Read persisted checklist state and hand it to the pure report builders.
//! - Expose the audit trail views (progress trend, recent changes) used by
//!   the dashboard and exports.

use crate::model::audit::{ChangeLogEntry, ProgressSnapshot};
use crate::repo::audit_repo::{AuditRepoError, AuditRepository};
use crate::repo::section_repo::{SectionRepoError, SectionRepository};
use crate::report::{
    build_readiness_report, stats_by_responsible, status_summary, ReadinessReport,
    ResponsibleStats, StatusSummary,
};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from reporting use-cases.
#[derive(Debug)]
pub enum ReportServiceError {
    /// Section persistence failure.
    Sections(SectionRepoError),
    /// Audit trail persistence failure.
    Audit(AuditRepoError),
}

impl Display for ReportServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sections(err) => write!(f, "{err}"),
            Self::Audit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReportServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sections(err) => Some(err),
            Self::Audit(err) => Some(err),
        }
    }
}

impl From<SectionRepoError> for ReportServiceError {
    fn from(value: SectionRepoError) -> Self {
        Self::Sections(value)
    }
}

impl From<AuditRepoError> for ReportServiceError {
    fn from(value: AuditRepoError) -> Self {
        Self::Audit(value)
    }
}

/// Reporting facade over the section and audit repositories.
pub struct ReportService<S: SectionRepository, A: AuditRepository> {
    sections: S,
    audit: A,
}

impl<S: SectionRepository, A: AuditRepository> ReportService<S, A> {
    /// Creates a service using the provided repository implementations.
    pub fn new(sections: S, audit: A) -> Self {
        Self { sections, audit }
    }

    /// Builds the full readiness report from persisted state.
    pub fn readiness_report(
        &self,
        today: NaiveDate,
        inspection_date: Option<NaiveDate>,
    ) -> Result<ReadinessReport, ReportServiceError> {
        let sections = self.sections.list_sections()?;
        Ok(build_readiness_report(&sections, today, inspection_date))
    }

    /// Item census plus overall completion.
    pub fn status_summary(&self) -> Result<StatusSummary, ReportServiceError> {
        let sections = self.sections.list_sections()?;
        Ok(status_summary(&sections))
    }

    /// Per-responsible census and completion.
    pub fn stats_by_responsible(&self) -> Result<Vec<ResponsibleStats>, ReportServiceError> {
        let sections = self.sections.list_sections()?;
        Ok(stats_by_responsible(&sections))
    }

    /// Daily completion snapshots, oldest first.
    pub fn progress_history(&self) -> Result<Vec<ProgressSnapshot>, ReportServiceError> {
        Ok(self.audit.progress_history()?)
    }

    /// Most recent status transitions, newest first.
    pub fn recent_changes(&self, limit: u32) -> Result<Vec<ChangeLogEntry>, ReportServiceError> {
        Ok(self.audit.recent_changes(limit)?)
    }
}
