//! Checklist section and item model.
//!
//! # Responsibility
//! - Define the checklist record tree: sections owning ordered items, items
//!   owning ordered evidence references.
//! - Represent status as closed enums and score as an explicit
//!   points-or-not-applicable variant, never an overloaded number.
//!
//! # Invariants
//! - `id` values are stable and never reassigned after template creation.
//! - `score` is always the value derived from `status` (see `scoring`).
//! - `progress` and section `status` are derived from `items`, never set
//!   directly by callers.
//! - `evidences` is append-only; insertion order is preserved.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Template-assigned section identifier (for example `"s3"`).
pub type SectionId = String;

/// Template-assigned item identifier (for example `"i301"`).
pub type ItemId = String;

/// Lifecycle status of one checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not started.
    Pending,
    /// Being worked on.
    InProgress,
    /// Verified ready for inspection.
    Done,
    /// Does not apply to this unit; excluded from progress metrics.
    NotApplicable,
}

/// All item statuses in census order.
pub const ITEM_STATUSES: [ItemStatus; 4] = [
    ItemStatus::Pending,
    ItemStatus::InProgress,
    ItemStatus::Done,
    ItemStatus::NotApplicable,
];

impl ItemStatus {
    /// Stable storage/wire encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::NotApplicable => "not_applicable",
        }
    }

    /// Parses the storage encoding back into the closed enum.
    ///
    /// # Errors
    /// - `InvalidStatusError` for any value outside the four known statuses.
    pub fn parse(value: &str) -> Result<Self, InvalidStatusError> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "not_applicable" => Ok(Self::NotApplicable),
            other => Err(InvalidStatusError(other.to_string())),
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status value outside the closed checklist enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusError(pub String);

impl Display for InvalidStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid checklist status `{}`; expected pending|in_progress|done|not_applicable",
            self.0
        )
    }
}

impl Error for InvalidStatusError {}

/// Item score derived from status.
///
/// `NotApplicable` is a distinct variant rather than a sentinel number, so
/// aggregation code cannot accidentally fold it into arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    /// Numeric score in {0, 5, 10}.
    Points(u8),
    /// Item is excluded from scoring.
    NotApplicable,
}

impl Score {
    /// Numeric value, if the score participates in arithmetic.
    pub fn points(self) -> Option<u8> {
        match self {
            Self::Points(value) => Some(value),
            Self::NotApplicable => None,
        }
    }
}

/// Attachment supporting an item's recorded status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    /// Original file name shown to reviewers.
    pub name: String,
    /// Retrieval URL returned by the blob store, when uploaded through it.
    pub url: Option<String>,
    /// Epoch ms upload time, stamped by the evidence service.
    pub uploaded_at: Option<i64>,
    /// Uploader attribution, stamped by the evidence service.
    pub uploaded_by: Option<String>,
}

impl EvidenceRef {
    /// Creates a bare named reference without upload metadata.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            uploaded_at: None,
            uploaded_by: None,
        }
    }
}

/// One checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionItem {
    /// Stable template-assigned id.
    pub id: ItemId,
    /// Human-readable requirement text, immutable after creation.
    pub title: String,
    pub status: ItemStatus,
    /// Derived from `status`; see `scoring::score_for_status`.
    pub score: Score,
    pub notes: String,
    /// Append-only attachment list in upload order.
    pub evidences: Vec<EvidenceRef>,
}

impl InspectionItem {
    /// Creates a pending item with zero score and no notes or evidence.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: ItemStatus::Pending,
            score: Score::Points(0),
            notes: String::new(),
            evidences: Vec::new(),
        }
    }
}

/// Derived lifecycle status of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Pending,
    InProgress,
    Done,
}

impl SectionStatus {
    /// Stable storage/wire encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

/// Validation failures for checklist section state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionValidationError {
    /// Section id is blank after trim.
    BlankSectionId,
    /// Section title is blank after trim.
    BlankTitle,
    /// An item id is blank after trim.
    BlankItemId,
    /// An item title is blank after trim.
    BlankItemTitle(ItemId),
    /// Two items in the same section share one id.
    DuplicateItemId(ItemId),
}

impl Display for SectionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankSectionId => write!(f, "section id must not be blank"),
            Self::BlankTitle => write!(f, "section title must not be blank"),
            Self::BlankItemId => write!(f, "item id must not be blank"),
            Self::BlankItemTitle(id) => write!(f, "item title must not be blank: {id}"),
            Self::DuplicateItemId(id) => write!(f, "duplicate item id in section: {id}"),
        }
    }
}

impl Error for SectionValidationError {}

/// A top-level inspection category owning an ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionSection {
    /// Stable template-assigned id.
    pub id: SectionId,
    /// Category title, immutable after creation.
    pub title: String,
    /// Person or role accountable for the section. May be empty.
    pub responsible: String,
    /// Target completion date, set by the unit.
    pub deadline: Option<NaiveDate>,
    /// Derived percentage of done items over eligible items.
    pub progress: u8,
    /// Derived from `progress`; see `scoring::recompute`.
    pub status: SectionStatus,
    /// Owned items; no item is shared across sections.
    pub items: Vec<InspectionItem>,
    /// Epoch ms of the last persisted change, stamped by the store.
    pub last_updated: Option<i64>,
    /// Attribution for the last persisted change, stamped by services.
    pub last_updated_by: Option<String>,
}

impl InspectionSection {
    /// Creates an empty pending section.
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            responsible: String::new(),
            deadline: None,
            progress: 0,
            status: SectionStatus::Pending,
            items: Vec::new(),
            last_updated: None,
            last_updated_by: None,
        }
    }

    /// Looks up one owned item by id.
    pub fn find_item(&self, item_id: &str) -> Option<&InspectionItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Checks structural validity before persistence.
    ///
    /// # Errors
    /// - Blank section/item identity fields.
    /// - Duplicate item ids within this section.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        if self.id.trim().is_empty() {
            return Err(SectionValidationError::BlankSectionId);
        }
        if self.title.trim().is_empty() {
            return Err(SectionValidationError::BlankTitle);
        }

        let mut seen = std::collections::HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(SectionValidationError::BlankItemId);
            }
            if item.title.trim().is_empty() {
                return Err(SectionValidationError::BlankItemTitle(item.id.clone()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(SectionValidationError::DuplicateItemId(item.id.clone()));
            }
        }
        Ok(())
    }
}
