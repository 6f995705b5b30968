//! Document upload and retrieval operations
//!
//! Upload runs text extraction inline: the document row is written with
//! its extracted text already populated, or with an empty string when
//! the payload is unparseable. The size cap is enforced before any
//! parsing work happens.

use serde::Deserialize;
use tracing::info;

use carelog_domain::{
    AuditAction, AuditEvent, Document, DocumentCategory, DocumentId, RecordId, UserId,
};
use carelog_extractor::TextExtractor;

use crate::error::ServiceError;
use crate::{emit_audit, now_secs, store_err, Backend, RequestMeta};

/// Limits applied to document uploads
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Maximum accepted payload size in bytes
    pub max_upload_bytes: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            // 20 MiB
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl DocumentConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Input for a document upload
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    /// Raw file bytes as received
    pub payload: Vec<u8>,
    /// Original filename as uploaded
    pub filename: String,
    /// Document category
    pub category: DocumentCategory,
    /// Structured record to attach the document to, if any
    pub record: Option<RecordId>,
}

/// Stateless operations over uploaded documents
pub struct DocumentService;

impl DocumentService {
    /// Ingest an uploaded document: enforce the size cap, extract text,
    /// persist, and audit
    ///
    /// Extraction is best-effort; an unreadable payload is stored with
    /// empty text rather than rejected. An attached record id must name
    /// one of the owner's active records.
    pub fn upload<S: Backend>(
        store: &mut S,
        extractor: &TextExtractor,
        config: &DocumentConfig,
        owner: UserId,
        upload: DocumentUpload,
        meta: &RequestMeta,
    ) -> Result<Document, ServiceError> {
        let size = upload.payload.len() as u64;
        if size > config.max_upload_bytes {
            return Err(ServiceError::PayloadTooLarge {
                size,
                max: config.max_upload_bytes,
            });
        }

        if let Some(record_id) = upload.record {
            store
                .get_record(owner, record_id)
                .map_err(store_err)?
                .ok_or(ServiceError::NotFound)?;
        }

        let text = extractor.extract(&upload.payload, &upload.filename);

        let mut document = Document::new(
            owner,
            upload.category,
            upload.filename,
            size,
            text,
            now_secs(),
        );
        document.record = upload.record;

        let id = store.create_document(document.clone()).map_err(store_err)?;
        info!(
            document_id = %id,
            size,
            extracted_chars = document.extracted_text.chars().count(),
            "Document ingested"
        );

        let event = AuditEvent::new(owner, AuditAction::Create, "MedicalDocument", id.to_string())
            .with_changes(vec![
                (
                    "filename".to_string(),
                    document.original_filename.clone(),
                ),
                (
                    "category".to_string(),
                    document.category.as_str().to_string(),
                ),
                (
                    "extracted_chars".to_string(),
                    document.extracted_text.chars().count().to_string(),
                ),
            ]);
        emit_audit(store, event, meta);

        Ok(document)
    }

    /// Get one of the owner's active documents
    pub fn get<S: Backend>(
        store: &S,
        owner: UserId,
        id: DocumentId,
    ) -> Result<Document, ServiceError> {
        store
            .get_document(owner, id)
            .map_err(store_err)?
            .ok_or(ServiceError::NotFound)
    }

    /// List the owner's active documents, most recent first
    pub fn list<S: Backend>(store: &S, owner: UserId) -> Result<Vec<Document>, ServiceError> {
        store.list_active_documents(owner).map_err(store_err)
    }

    /// Soft-delete a document and audit the deletion
    pub fn soft_delete<S: Backend>(
        store: &mut S,
        owner: UserId,
        id: DocumentId,
        meta: &RequestMeta,
    ) -> Result<(), ServiceError> {
        Self::get(store, owner, id)?;
        store.soft_delete_document(owner, id).map_err(store_err)?;
        info!(document_id = %id, "Document soft-deleted");

        let event = AuditEvent::new(owner, AuditAction::Delete, "MedicalDocument", id.to_string());
        emit_audit(store, event, meta);
        Ok(())
    }
}
