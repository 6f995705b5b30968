//! Carelog service layer
//!
//! Stateless orchestration over the domain traits: ownership checks,
//! validation, audit emission, and the glue between extraction, storage,
//! and context assembly. Services are generic over a [`Backend`], one
//! store implementing every persistence trait with a shared error type.
//!
//! Audit emission is best-effort throughout: a failed audit write is
//! logged and never fails or rolls back the primary operation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod documents;
pub mod error;
pub mod records;
pub mod triage;

pub use context::ContextService;
pub use documents::{DocumentConfig, DocumentService, DocumentUpload};
pub use error::ServiceError;
pub use records::{NewRecord, RecordService};
pub use triage::{NewSession, NewTriageResult, TriageService};

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use carelog_domain::traits::{AuditSink, DocumentStore, RecordStore, TriageStore};
use carelog_domain::AuditEvent;
use tracing::warn;

/// A persistence backend providing every store trait with one shared
/// error type. Blanket-implemented; `carelog-store`'s `SqliteStore`
/// qualifies automatically.
pub trait Backend:
    RecordStore<Error = Self::Err>
    + DocumentStore<Error = Self::Err>
    + TriageStore<Error = Self::Err>
    + AuditSink<Error = Self::Err>
{
    /// Shared error type across the store traits
    type Err: fmt::Display;
}

impl<T, E> Backend for T
where
    E: fmt::Display,
    T: RecordStore<Error = E>
        + DocumentStore<Error = E>
        + TriageStore<Error = E>
        + AuditSink<Error = E>,
{
    type Err = E;
}

/// Client request metadata carried into audit events
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Client IP address, if known
    pub ip_address: Option<String>,
    /// Client user agent, possibly empty
    pub user_agent: String,
}

impl RequestMeta {
    /// Metadata with both fields populated
    pub fn new(ip_address: Option<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip_address,
            user_agent: user_agent.into(),
        }
    }
}

/// Current wall-clock time as Unix seconds
pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Map an opaque store error into the service error space
pub(crate) fn store_err<E: fmt::Display>(e: E) -> ServiceError {
    ServiceError::Store(e.to_string())
}

/// Append an audit event, logging instead of failing on error
pub(crate) fn emit_audit<S: Backend>(store: &mut S, event: AuditEvent, meta: &RequestMeta) {
    let event = event.with_client(meta.ip_address.clone(), meta.user_agent.clone());
    if let Err(e) = AuditSink::record(store, event) {
        warn!("Audit write failed: {}", e);
    }
}
