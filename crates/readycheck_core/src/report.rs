//! Readiness report builders.
//!
//! # Responsibility
//! - Assemble the plain-data summary blocks consumed by dashboards and by
//!   the external PDF/chart collaborators.
//!
//! # Invariants
//! - Builders are pure functions over section values; persistence access
//!   belongs to `service::report_service`.
//! - Per-responsible breakdowns are sorted by responsible name so exports
//!   render deterministically.

use crate::model::section::{InspectionSection, ItemStatus, SectionStatus};
use crate::scoring::{self, StatusCounts};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Item census plus overall completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub counts: StatusCounts,
    /// Percent of `Done` over eligible items, round-half-up.
    pub progress: u8,
}

/// Builds the item census and completion block.
pub fn status_summary(sections: &[InspectionSection]) -> StatusSummary {
    StatusSummary {
        counts: scoring::status_counts(sections),
        progress: scoring::aggregate_completion(sections),
    }
}

/// Per-responsible item census and completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsibleStats {
    pub responsible: String,
    pub counts: StatusCounts,
    pub progress: u8,
}

/// Groups item counts by section responsible.
///
/// Sections with a blank responsible are skipped, matching the dashboard's
/// grouping behavior. Output is sorted by responsible name.
pub fn stats_by_responsible(sections: &[InspectionSection]) -> Vec<ResponsibleStats> {
    let mut grouped: BTreeMap<&str, StatusCounts> = BTreeMap::new();

    for section in sections {
        let responsible = section.responsible.trim();
        if responsible.is_empty() {
            continue;
        }

        let counts = grouped.entry(responsible).or_default();
        for item in &section.items {
            match item.status {
                ItemStatus::Pending => counts.pending += 1,
                ItemStatus::InProgress => counts.in_progress += 1,
                ItemStatus::Done => counts.done += 1,
                ItemStatus::NotApplicable => counts.not_applicable += 1,
            }
        }
    }

    grouped
        .into_iter()
        .map(|(responsible, counts)| ResponsibleStats {
            responsible: responsible.to_string(),
            progress: scoring::percent_rounded(counts.done, counts.eligible()),
            counts,
        })
        .collect()
}

/// Signed day count from `today` until `target`; negative once past.
pub fn days_remaining(today: NaiveDate, target: NaiveDate) -> i64 {
    target.signed_duration_since(today).num_days()
}

/// Headline readiness block: the data behind the exported summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessReport {
    pub generated_on: NaiveDate,
    pub inspection_date: Option<NaiveDate>,
    pub days_remaining: Option<i64>,
    /// Mean item score over eligible items, one decimal place.
    pub average_score: f64,
    /// Percent of `Done` over eligible items, round-half-up.
    pub completion_percent: u8,
    pub total_sections: usize,
    pub completed_sections: usize,
    pub summary: StatusSummary,
    pub by_responsible: Vec<ResponsibleStats>,
}

/// Builds the full readiness report from in-memory sections.
pub fn build_readiness_report(
    sections: &[InspectionSection],
    today: NaiveDate,
    inspection_date: Option<NaiveDate>,
) -> ReadinessReport {
    ReadinessReport {
        generated_on: today,
        inspection_date,
        days_remaining: inspection_date.map(|date| days_remaining(today, date)),
        average_score: scoring::aggregate_score(sections),
        completion_percent: scoring::aggregate_completion(sections),
        total_sections: sections.len(),
        completed_sections: sections
            .iter()
            .filter(|section| section.status == SectionStatus::Done)
            .count(),
        summary: status_summary(sections),
        by_responsible: stats_by_responsible(sections),
    }
}
