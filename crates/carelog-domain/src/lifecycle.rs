//! Entity lifecycle state
//!
//! Deletion is a flag flip, never a row removal, preserving audit
//! continuity. Modeling the flag as a state makes "excluded from all
//! context-building reads" enforceable at the store-query boundary.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a soft-deletable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Entity is live and visible to every read path
    Active,
    /// Entity is soft-deleted and excluded from all reads
    Deleted,
}

impl Lifecycle {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Active => "active",
            Lifecycle::Deleted => "deleted",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "active" => Ok(Lifecycle::Active),
            "deleted" => Ok(Lifecycle::Deleted),
            _ => Err(format!("Unknown lifecycle state: {}", s)),
        }
    }

    /// Whether the entity is live
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}
