//! Attribution reference for the external auth collaborator.
//!
//! Authentication itself lives outside this crate; the only contact surface
//! is the opaque `{ name, role }` pair consumed for `last_updated_by`-style
//! attribution fields.

use serde::{Deserialize, Serialize};

/// Opaque user reference handed in by the calling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub name: String,
    pub role: String,
}

impl UserRef {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}
