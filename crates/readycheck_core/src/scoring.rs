//! Checklist aggregation engine.
//!
//! # Responsibility
//! - Derive item scores from status and section progress/status from items.
//! - Produce the cross-section readiness metrics (average score, completion
//!   percentage, status census) used by dashboards and reports.
//!
//! # Invariants
//! - Every function is synchronous, deterministic, and free of I/O; inputs
//!   are never mutated, edits return a fresh section value.
//! - `NotApplicable` items are excluded from both numerator and denominator
//!   of progress and score aggregation, by explicit status comparison.
//! - A section with no eligible items has `progress == 0` and
//!   `status == Pending`.
//! - Item identity is stable across recomputation; an edit touches only the
//!   addressed item's `status`, `score`, and `notes`.

use crate::model::section::{
    EvidenceRef, InspectionSection, ItemStatus, Score, SectionStatus,
};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from engine operations.
///
/// Both indicate a caller bug (stale or foreign id), not a recoverable
/// runtime condition; callers should fail loudly instead of defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The addressed item does not exist in the given section.
    ItemNotFound {
        section_id: String,
        item_id: String,
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ItemNotFound {
                section_id,
                item_id,
            } => write!(f, "item `{item_id}` not found in section `{section_id}`"),
        }
    }
}

impl Error for EngineError {}

/// Maps an item status to its score.
///
/// Total over the closed enum: `Done -> 10`, `InProgress -> 5`,
/// `Pending -> 0`, `NotApplicable -> Score::NotApplicable`.
pub fn score_for_status(status: ItemStatus) -> Score {
    match status {
        ItemStatus::Done => Score::Points(10),
        ItemStatus::InProgress => Score::Points(5),
        ItemStatus::Pending => Score::Points(0),
        ItemStatus::NotApplicable => Score::NotApplicable,
    }
}

/// Rederives every item score plus section `progress` and `status`.
///
/// Used by edit operations and by seeding paths that build sections from
/// raw template data.
pub fn recompute(mut section: InspectionSection) -> InspectionSection {
    for item in &mut section.items {
        item.score = score_for_status(item.status);
    }

    let eligible = section
        .items
        .iter()
        .filter(|item| item.status != ItemStatus::NotApplicable)
        .count();
    let done = section
        .items
        .iter()
        .filter(|item| item.status == ItemStatus::Done)
        .count();

    section.progress = percent_rounded(done, eligible);
    section.status = match section.progress {
        0 => SectionStatus::Pending,
        100 => SectionStatus::Done,
        _ => SectionStatus::InProgress,
    };
    section
}

/// Applies a status/notes edit to one item and rederives section state.
///
/// # Contract
/// - `new_notes: None` keeps the existing notes; `Some` replaces them.
/// - The input section is left untouched; the returned value satisfies all
///   derivation invariants.
///
/// # Errors
/// - `EngineError::ItemNotFound` when `item_id` is not in `section`; no
///   partially-updated section is produced.
pub fn apply_item_edit(
    section: &InspectionSection,
    item_id: &str,
    new_status: ItemStatus,
    new_notes: Option<&str>,
) -> Result<InspectionSection, EngineError> {
    let mut updated = section.clone();
    let item = updated
        .items
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| EngineError::ItemNotFound {
            section_id: section.id.clone(),
            item_id: item_id.to_string(),
        })?;

    item.status = new_status;
    item.score = score_for_status(new_status);
    if let Some(notes) = new_notes {
        item.notes = notes.to_string();
    }

    Ok(recompute(updated))
}

/// Appends one evidence reference to an item.
///
/// Evidence order is insertion order; `score`, `progress`, and section
/// `status` are unaffected.
///
/// # Errors
/// - `EngineError::ItemNotFound` when `item_id` is not in `section`.
pub fn append_evidence(
    section: &InspectionSection,
    item_id: &str,
    evidence: EvidenceRef,
) -> Result<InspectionSection, EngineError> {
    let mut updated = section.clone();
    let item = updated
        .items
        .iter_mut()
        .find(|item| item.id == item_id)
        .ok_or_else(|| EngineError::ItemNotFound {
            section_id: section.id.clone(),
            item_id: item_id.to_string(),
        })?;

    item.evidences.push(evidence);
    Ok(updated)
}

/// Mean item score across all sections, excluding `NotApplicable` items
/// from numerator and denominator, rounded to one decimal place.
///
/// Returns `0.0` when no eligible item exists.
pub fn aggregate_score(sections: &[InspectionSection]) -> f64 {
    let mut total: u64 = 0;
    let mut count: u64 = 0;

    for section in sections {
        for item in &section.items {
            if item.status == ItemStatus::NotApplicable {
                continue;
            }
            total += u64::from(score_for_status(item.status).points().unwrap_or(0));
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }
    let mean = total as f64 / count as f64;
    (mean * 10.0).round() / 10.0
}

/// Integer percentage of `Done` items over eligible items across all
/// sections, round-half-up. Returns `0` for an empty eligible set.
pub fn aggregate_completion(sections: &[InspectionSection]) -> u8 {
    let mut eligible = 0usize;
    let mut done = 0usize;

    for section in sections {
        for item in &section.items {
            if item.status == ItemStatus::NotApplicable {
                continue;
            }
            eligible += 1;
            if item.status == ItemStatus::Done {
                done += 1;
            }
        }
    }

    percent_rounded(done, eligible)
}

/// Census of item statuses across all sections.
///
/// Unlike the progress metrics, every status counts here, including
/// `NotApplicable`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    pub not_applicable: usize,
}

impl StatusCounts {
    /// Count for one status value.
    pub fn count(&self, status: ItemStatus) -> usize {
        match status {
            ItemStatus::Pending => self.pending,
            ItemStatus::InProgress => self.in_progress,
            ItemStatus::Done => self.done,
            ItemStatus::NotApplicable => self.not_applicable,
        }
    }

    /// Total items counted.
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.done + self.not_applicable
    }

    /// Items participating in progress metrics.
    pub fn eligible(&self) -> usize {
        self.total() - self.not_applicable
    }
}

/// Counts items by status across all sections.
pub fn status_counts(sections: &[InspectionSection]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for section in sections {
        for item in &section.items {
            match item.status {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::InProgress => counts.in_progress += 1,
                ItemStatus::Done => counts.done += 1,
                ItemStatus::NotApplicable => counts.not_applicable += 1,
            }
        }
    }
    counts
}

/// Round-half-up integer percentage; `0` when the denominator is zero.
pub(crate) fn percent_rounded(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u8
}
