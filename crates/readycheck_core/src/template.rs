//! Built-in station-readiness checklist template.
//!
//! # Responsibility
//! - Provide the fixed section/item catalog a new store is seeded from.
//!
//! # Invariants
//! - Section ids (`s1`..) and item ids (`i<section><nn>`) are unique across
//!   the template and stable across releases; dashboards and audit records
//!   reference them.
//! - Every templated item starts `Pending` with zero score.

use crate::model::section::{InspectionItem, InspectionSection};
use crate::scoring;

/// Returns the default checklist, ready for seeding.
pub fn default_checklist() -> Vec<InspectionSection> {
    let catalog: &[(&str, &str, &str, &[(&str, &str)])] = &[
        (
            "s1",
            "Inspecting-authority reception",
            "Operations Officer",
            &[
                ("i101", "Alert signal executed and arrival announced verbally"),
                ("i102", "Bugle call for the highest-ranking authority present"),
                ("i103", "Guard presented by the guard commander"),
                ("i104", "General salute with vehicle sound and light devices"),
                ("i105", "Troop presented by the unit commander"),
                ("i106", "Formation turnout and bearing"),
            ],
        ),
        (
            "s2",
            "National flag ceremony",
            "Ceremony Sergeant",
            &[
                ("i201", "Flag-hoisting ceremony conducted as prescribed"),
                ("i202", "Full contingent formed, officers and enlisted"),
                ("i203", "Anthems and unit songs sung by all present"),
                ("i204", "National flag in good condition"),
                ("i205", "State flag and command pennant in good condition"),
            ],
        ),
        (
            "s3",
            "Operational documentation",
            "Administration Captain",
            &[
                ("i301", "Duty roster current and posted in a visible place"),
                ("i302", "Simulated-operation records for the last two years on file"),
                ("i303", "Employment, call-out, and section plans filed in the duty office"),
                ("i304", "Monthly training reports for officers and enlisted"),
                ("i305", "Incident certificates under control and archived"),
            ],
        ),
        (
            "s4",
            "Dispatch readiness",
            "Duty Officer",
            &[
                ("i401", "Station alarm and public-address system tested"),
                ("i402", "Dispatch log complete and current"),
                ("i403", "Radio equipment checked on all channels"),
                ("i404", "Turnout response-time drill within standard"),
            ],
        ),
        (
            "s5",
            "Operational area records",
            "Planning Lieutenant",
            &[
                ("i501", "Operational area map current and displayed"),
                ("i502", "Hydrant registry verified against the field"),
                ("i503", "Risk survey records for critical premises current"),
            ],
        ),
        (
            "s6",
            "Station facilities",
            "Facilities Sergeant",
            &[
                ("i601", "Dormitories clean and standardized"),
                ("i602", "Kitchen mesh screens intact"),
                ("i603", "Storerooms organized with inventory cards"),
                ("i604", "External areas and parade ground maintained"),
            ],
        ),
        (
            "s7",
            "Operational vehicles",
            "Fleet Lieutenant",
            &[
                ("i701", "Pump apparatus checked and mission-ready"),
                ("i702", "Ladder apparatus checked and mission-ready"),
                ("i703", "Vehicle logbooks complete and signed"),
                ("i704", "Mounted equipment inventory matches the load list"),
            ],
        ),
        (
            "s8",
            "Uniforms and protective equipment",
            "Logistics Sergeant",
            &[
                ("i801", "Personal protective kit complete for the whole roster"),
                ("i802", "Uniform completeness verified for all personnel"),
                ("i803", "Breathing apparatus within service dates"),
            ],
        ),
    ];

    catalog
        .iter()
        .map(|(id, title, responsible, items)| {
            let mut section = InspectionSection::new(*id, *title);
            section.responsible = (*responsible).to_string();
            section.items = items
                .iter()
                .map(|(item_id, item_title)| InspectionItem::new(*item_id, *item_title))
                .collect();
            scoring::recompute(section)
        })
        .collect()
}
