//! Checklist use-case service.
//!
//! # Responsibility
//! - Drive the edit flow: load section, recompute through the scoring
//!   engine, persist, audit.
//! - Seed the built-in template into an empty store.
//!
//! # Invariants
//! - A status transition always leaves a change-log entry; an edit that
//!   keeps the status does not.
//! - When an item newly becomes `Done`, the day's overall completion
//!   snapshot is recorded (one row per calendar date).
//! - Engine failures abort before any write; no partially-updated section
//!   is ever persisted.

use crate::model::audit::ChangeLogEntry;
use crate::model::section::{InspectionSection, ItemStatus};
use crate::model::user::UserRef;
use crate::repo::audit_repo::{AuditRepoError, AuditRepository};
use crate::repo::section_repo::{SectionRepoError, SectionRepository};
use crate::scoring::{self, EngineError};
use crate::template;
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Errors from checklist use-cases.
#[derive(Debug)]
pub enum ChecklistServiceError {
    /// Target section does not exist.
    SectionNotFound(String),
    /// Target item does not exist in the section.
    ItemNotFound {
        section_id: String,
        item_id: String,
    },
    /// Section persistence failure.
    Sections(SectionRepoError),
    /// Audit trail persistence failure.
    Audit(AuditRepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ChecklistServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::ItemNotFound {
                section_id,
                item_id,
            } => write!(f, "item `{item_id}` not found in section `{section_id}`"),
            Self::Sections(err) => write!(f, "{err}"),
            Self::Audit(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent checklist state: {details}")
            }
        }
    }
}

impl Error for ChecklistServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sections(err) => Some(err),
            Self::Audit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SectionRepoError> for ChecklistServiceError {
    fn from(value: SectionRepoError) -> Self {
        match value {
            SectionRepoError::NotFound(id) => Self::SectionNotFound(id),
            other => Self::Sections(other),
        }
    }
}

impl From<EngineError> for ChecklistServiceError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::ItemNotFound {
                section_id,
                item_id,
            } => Self::ItemNotFound {
                section_id,
                item_id,
            },
        }
    }
}

impl From<AuditRepoError> for ChecklistServiceError {
    fn from(value: AuditRepoError) -> Self {
        Self::Audit(value)
    }
}

/// Checklist service facade over section and audit repositories.
pub struct ChecklistService<S: SectionRepository, A: AuditRepository> {
    sections: S,
    audit: A,
}

impl<S: SectionRepository, A: AuditRepository> ChecklistService<S, A> {
    /// Creates a service using the provided repository implementations.
    pub fn new(sections: S, audit: A) -> Self {
        Self { sections, audit }
    }

    /// Applies a status/notes edit to one item and persists the result.
    ///
    /// # Contract
    /// - `notes: None` keeps the item's existing notes.
    /// - On a status transition, appends a change-log entry attributed to
    ///   `editor`; when the item newly becomes `Done`, upserts the overall
    ///   completion snapshot for `today`.
    /// - Returns the persisted section as read back from the store.
    pub fn apply_item_edit(
        &self,
        section_id: &str,
        item_id: &str,
        new_status: ItemStatus,
        notes: Option<&str>,
        editor: &UserRef,
        today: NaiveDate,
    ) -> Result<InspectionSection, ChecklistServiceError> {
        let section = self
            .sections
            .get_section(section_id)?
            .ok_or_else(|| ChecklistServiceError::SectionNotFound(section_id.to_string()))?;

        let old_item = section
            .find_item(item_id)
            .cloned()
            .ok_or_else(|| ChecklistServiceError::ItemNotFound {
                section_id: section_id.to_string(),
                item_id: item_id.to_string(),
            })?;

        let mut updated = scoring::apply_item_edit(&section, item_id, new_status, notes)?;
        updated.last_updated_by = Some(editor.name.clone());
        self.sections.replace_section(&updated)?;

        if old_item.status != new_status {
            self.audit.append_change(&ChangeLogEntry {
                id: Uuid::new_v4(),
                section_id: section.id.clone(),
                section_title: section.title.clone(),
                item_id: old_item.id.clone(),
                item_title: old_item.title.clone(),
                old_status: old_item.status,
                new_status,
                changed_by: editor.name.clone(),
                changed_at: None,
            })?;
            info!(
                "event=item_status_change module=checklist section={} item={} from={} to={}",
                section.id, old_item.id, old_item.status, new_status
            );

            if new_status == ItemStatus::Done {
                // The replace above already landed, so the listing reflects
                // the edit.
                let all_sections = self.sections.list_sections()?;
                let percent = scoring::aggregate_completion(&all_sections);
                self.audit.record_progress(today, percent)?;
            }
        }

        self.sections
            .get_section(section_id)?
            .ok_or(ChecklistServiceError::InconsistentState(
                "edited section missing on read-back",
            ))
    }

    /// Updates section responsible/deadline metadata.
    pub fn update_metadata(
        &self,
        section_id: &str,
        responsible: &str,
        deadline: Option<NaiveDate>,
        editor: &UserRef,
    ) -> Result<InspectionSection, ChecklistServiceError> {
        self.sections
            .update_metadata(section_id, responsible, deadline, &editor.name)?;
        self.sections
            .get_section(section_id)?
            .ok_or(ChecklistServiceError::InconsistentState(
                "updated section missing on read-back",
            ))
    }

    /// Seeds the built-in template when the store holds no sections.
    ///
    /// Returns the number of sections inserted; `0` means the store was
    /// already populated and nothing was touched.
    pub fn seed_default_checklist(&self) -> Result<usize, ChecklistServiceError> {
        if !self.sections.list_sections()?.is_empty() {
            return Ok(0);
        }

        let sections = template::default_checklist();
        for section in &sections {
            self.sections.insert_section(section)?;
        }
        info!(
            "event=checklist_seeded module=checklist sections={}",
            sections.len()
        );
        Ok(sections.len())
    }

    /// Loads one section.
    pub fn get_section(
        &self,
        section_id: &str,
    ) -> Result<Option<InspectionSection>, ChecklistServiceError> {
        Ok(self.sections.get_section(section_id)?)
    }

    /// Loads every section in template order.
    pub fn list_sections(&self) -> Result<Vec<InspectionSection>, ChecklistServiceError> {
        Ok(self.sections.list_sections()?)
    }
}
