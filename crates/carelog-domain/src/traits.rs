//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates (carelog-store).
//! Every read used for context assembly filters by owner and excludes
//! soft-deleted entities at this boundary.

use crate::audit::AuditEvent;
use crate::document::Document;
use crate::ids::{DocumentId, RecordId, SessionId, UserId};
use crate::record::{Record, RecordCategory};
use crate::triage::{TriageResult, TriageSession, TriageStatus};

/// Trait for storing and retrieving structured medical records
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Persist a new record
    fn create_record(&mut self, record: Record) -> Result<RecordId, Self::Error>;

    /// Get one of the owner's records by ID; soft-deleted records and other
    /// owners' records are absent, not errors
    fn get_record(&self, owner: UserId, id: RecordId) -> Result<Option<Record>, Self::Error>;

    /// List the owner's active records, optionally filtered by category,
    /// ordered by occurrence date descending then creation descending
    fn list_active_records(
        &self,
        owner: UserId,
        category: Option<RecordCategory>,
    ) -> Result<Vec<Record>, Self::Error>;

    /// Persist field changes to an existing record
    fn update_record(&mut self, record: &Record) -> Result<(), Self::Error>;

    /// Flip the record's lifecycle to Deleted
    fn soft_delete_record(&mut self, owner: UserId, id: RecordId) -> Result<(), Self::Error>;
}

/// Trait for storing and retrieving uploaded documents
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Persist a new document
    fn create_document(&mut self, document: Document) -> Result<DocumentId, Self::Error>;

    /// Get one of the owner's documents by ID
    fn get_document(&self, owner: UserId, id: DocumentId) -> Result<Option<Document>, Self::Error>;

    /// List the owner's active documents, most recent first
    fn list_active_documents(&self, owner: UserId) -> Result<Vec<Document>, Self::Error>;

    /// Flip the document's lifecycle to Deleted
    fn soft_delete_document(&mut self, owner: UserId, id: DocumentId) -> Result<(), Self::Error>;

    /// Null the weak back-reference on every document pointing at the given
    /// record. Called when the record is soft-deleted; never cascades.
    fn detach_record(&mut self, owner: UserId, record: RecordId) -> Result<(), Self::Error>;
}

/// Trait for storing triage sessions and their results
pub trait TriageStore {
    /// Error type for store operations
    type Error;

    /// Persist a new session
    fn create_session(&mut self, session: TriageSession) -> Result<SessionId, Self::Error>;

    /// Get one of the owner's sessions by ID
    fn get_session(
        &self,
        owner: UserId,
        id: SessionId,
    ) -> Result<Option<TriageSession>, Self::Error>;

    /// List the owner's active sessions, most recent first
    fn list_sessions(&self, owner: UserId) -> Result<Vec<TriageSession>, Self::Error>;

    /// Update a session's processing status
    fn update_session_status(
        &mut self,
        owner: UserId,
        id: SessionId,
        status: TriageStatus,
    ) -> Result<(), Self::Error>;

    /// Persist the 1:1 result for a session
    fn save_result(&mut self, result: TriageResult) -> Result<(), Self::Error>;

    /// Get the result for a session, if inference has completed
    fn get_result(&self, session: SessionId) -> Result<Option<TriageResult>, Self::Error>;
}

/// Trait for the append-only audit sink
///
/// Consumed fire-and-forget: callers log and continue on failure.
pub trait AuditSink {
    /// Error type for sink operations
    type Error;

    /// Append one audit event
    fn record(&mut self, event: AuditEvent) -> Result<(), Self::Error>;
}
