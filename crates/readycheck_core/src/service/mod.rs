//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine recomputation, repository calls, and audit writes
//!   into use-case level APIs.
//! - Keep UI layers decoupled from storage and scoring details.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Attribution and timestamps are stamped here (or by the store), never
//!   inside the scoring engine.

pub mod checklist_service;
pub mod event_service;
pub mod evidence_service;
pub mod report_service;
pub mod task_service;
