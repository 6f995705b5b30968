//! Carelog Domain Layer
//!
//! This crate contains the core domain model for Carelog: a patient-facing
//! medical-records and AI-triage backend. It defines the entities, closed
//! enumerations, value objects, and trait interfaces that all other layers
//! depend upon.
//!
//! ## Key Concepts
//!
//! - **Record**: one structured medical fact entry (condition, medication,
//!   allergy, ...) owned by a patient
//! - **Document**: an uploaded file with best-effort extracted text,
//!   optionally linked to a Record via a weak back-reference
//! - **Lifecycle**: soft deletion is a lifecycle state (Active | Deleted),
//!   never a hard delete
//! - **Triage**: sessions and results for the AI symptom-triage flow
//!
//! ## Architecture
//!
//! - Closed enums with exhaustive matching at every consumption site
//! - Trait definitions for all external interactions (stores, audit sink)
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod document;
pub mod ids;
pub mod lifecycle;
pub mod record;
pub mod traits;
pub mod triage;

// Re-exports for convenience
pub use audit::{AuditAction, AuditEvent};
pub use document::{Document, DocumentCategory};
pub use ids::{DocumentId, RecordId, ResultId, SessionId, UserId};
pub use lifecycle::Lifecycle;
pub use record::{Attributes, Record, RecordCategory, RecordStatus, Severity};
pub use triage::{
    InferenceMode, TriageResult, TriageSession, TriageSeverity, TriageSource, TriageStatus,
};
