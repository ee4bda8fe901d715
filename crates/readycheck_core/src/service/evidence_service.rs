//! Evidence upload use-case service.
//!
//! # Responsibility
//! - Store evidence files through the blob store boundary and append the
//!   resulting reference to the owning item.
//!
//! # Invariants
//! - The target item is resolved before the blob is written, so a stale id
//!   never leaves an orphaned upload.
//! - Evidence is append-only; scores and progress are unaffected.

use crate::blob::{BlobError, BlobStore};
use crate::model::section::{EvidenceRef, InspectionSection};
use crate::model::user::UserRef;
use crate::repo::section_repo::{SectionRepoError, SectionRepository};
use crate::scoring::{self, EngineError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from evidence use-cases.
#[derive(Debug)]
pub enum EvidenceServiceError {
    /// Target section does not exist.
    SectionNotFound(String),
    /// Target item does not exist in the section.
    ItemNotFound {
        section_id: String,
        item_id: String,
    },
    /// File name is blank after trim.
    InvalidFileName,
    /// Blob store failure.
    Blob(BlobError),
    /// Section persistence failure.
    Sections(SectionRepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EvidenceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::ItemNotFound {
                section_id,
                item_id,
            } => write!(f, "item `{item_id}` not found in section `{section_id}`"),
            Self::InvalidFileName => write!(f, "evidence file name must not be blank"),
            Self::Blob(err) => write!(f, "{err}"),
            Self::Sections(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent evidence state: {details}")
            }
        }
    }
}

impl Error for EvidenceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Blob(err) => Some(err),
            Self::Sections(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BlobError> for EvidenceServiceError {
    fn from(value: BlobError) -> Self {
        Self::Blob(value)
    }
}

impl From<SectionRepoError> for EvidenceServiceError {
    fn from(value: SectionRepoError) -> Self {
        match value {
            SectionRepoError::NotFound(id) => Self::SectionNotFound(id),
            other => Self::Sections(other),
        }
    }
}

impl From<EngineError> for EvidenceServiceError {
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

/// Evidence service facade over the section repository and a blob store.
pub struct EvidenceService<S: SectionRepository, B: BlobStore> {
    sections: S,
    blobs: B,
}

impl<S: SectionRepository, B: BlobStore> EvidenceService<S, B> {
    /// Creates a service using the provided repository and blob store.
    pub fn new(sections: S, blobs: B) -> Self {
        Self { sections, blobs }
    }

    /// Uploads one evidence file and appends its reference to the item.
    ///
    /// # Contract
    /// - The blob lands under `evidences/<section>/<item>/<now_ms>_<name>`.
    /// - `now_ms` is the caller's clock (epoch ms); it keeps blob paths
    ///   unique and stamps `uploaded_at`.
    /// - Returns the persisted section as read back from the store.
    pub fn upload_evidence(
        &self,
        section_id: &str,
        item_id: &str,
        file_name: &str,
        bytes: &[u8],
        uploader: &UserRef,
        now_ms: i64,
    ) -> Result<InspectionSection, EvidenceServiceError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(EvidenceServiceError::InvalidFileName);
        }

        let section = self
            .sections
            .get_section(section_id)?
            .ok_or_else(|| EvidenceServiceError::SectionNotFound(section_id.to_string()))?;

        if section.find_item(item_id).is_none() {
            return Err(EvidenceServiceError::ItemNotFound {
                section_id: section_id.to_string(),
                item_id: item_id.to_string(),
            });
        }

        let path = format!("evidences/{section_id}/{item_id}/{now_ms}_{file_name}");
        let url = self.blobs.upload(bytes, &path)?;

        let evidence = EvidenceRef {
            name: file_name.to_string(),
            url: Some(url),
            uploaded_at: Some(now_ms),
            uploaded_by: Some(uploader.name.clone()),
        };

        let mut updated = scoring::append_evidence(&section, item_id, evidence)?;
        updated.last_updated_by = Some(uploader.name.clone());
        self.sections.replace_section(&updated)?;

        info!(
            "event=evidence_attached module=evidence section={section_id} item={item_id} name={file_name}"
        );

        self.sections
            .get_section(section_id)?
            .ok_or(EvidenceServiceError::InconsistentState(
                "section missing on read-back after evidence upload",
            ))
    }
}
