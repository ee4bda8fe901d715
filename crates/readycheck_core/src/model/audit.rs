//! Audit trail records: status change log and daily progress snapshots.
//!
//! # Invariants
//! - Change-log entries are append-only and never edited.
//! - `progress_history` holds at most one snapshot per calendar date; a
//!   later recording for the same date replaces the percentage.

use crate::model::section::ItemStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded status transition of a checklist item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: Uuid,
    pub section_id: String,
    pub section_title: String,
    pub item_id: String,
    pub item_title: String,
    pub old_status: ItemStatus,
    pub new_status: ItemStatus,
    /// Name of the user who made the edit.
    pub changed_by: String,
    /// Epoch ms, stamped by the store.
    pub changed_at: Option<i64>,
}

/// Overall completion recorded for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub date: NaiveDate,
    /// Overall completion percentage at recording time.
    pub percent: u8,
    /// Epoch ms, stamped by the store.
    pub recorded_at: Option<i64>,
}
