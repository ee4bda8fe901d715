//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `readycheck_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use readycheck_core::template::default_checklist;

fn main() {
    let sections = default_checklist();
    let items: usize = sections.iter().map(|section| section.items.len()).sum();

    println!("readycheck_core version={}", readycheck_core::core_version());
    println!("readycheck_core template_sections={} template_items={items}", sections.len());
}
