//! Ad-hoc preparation task model.
//!
//! # Responsibility
//! - Define the task record tracked alongside the checklist (ordinary
//!   create/update/delete lifecycle, unlike checklist items).
//!
//! # Invariants
//! - `id` is store-assigned once and never reused.
//! - Tasks may reference a checklist section loosely by id; the reference is
//!   informational and never enforced as a foreign key.

use crate::model::section::ItemStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Scheduling priority for preparation tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// Stable storage/wire encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Validation failures for task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is blank after trim.
    BlankTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

/// One ad-hoc preparation task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTask {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    pub priority: TaskPriority,
    /// Person or role the task is assigned to. May be empty.
    pub responsible: String,
    pub due_date: NaiveDate,
    /// Loose back-reference to a checklist section.
    pub section_id: Option<String>,
    /// Epoch ms creation time, stamped by the store.
    pub created_at: Option<i64>,
    pub created_by: Option<String>,
    /// Epoch ms of the last persisted change, stamped by the store.
    pub last_updated: Option<i64>,
    pub last_updated_by: Option<String>,
}

impl ActionTask {
    /// Creates a pending task with a generated id.
    pub fn new(title: impl Into<String>, priority: TaskPriority, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            status: ItemStatus::Pending,
            priority,
            responsible: String::new(),
            due_date,
            section_id: None,
            created_at: None,
            created_by: None,
            last_updated: None,
            last_updated_by: None,
        }
    }

    /// Checks structural validity before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        Ok(())
    }
}
