//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the readiness store.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths enforce model `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it.
//! - Callers depend on the traits; concrete store handles are injected.

pub mod audit_repo;
pub mod event_repo;
pub mod section_repo;
pub mod task_repo;
