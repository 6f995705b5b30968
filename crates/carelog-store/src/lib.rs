//! Carelog Storage Layer
//!
//! SQLite implementation of the domain store traits plus the audit sink.
//!
//! # Architecture
//!
//! - One SQLite database holding records, documents, triage sessions and
//!   results, and the append-only audit log
//! - Identifiers stored as 16-byte big-endian blobs
//! - Closed enumerations stored as canonical strings with exhaustive
//!   matching in both directions
//! - Soft deletion enforced at the query boundary: every read used for
//!   context assembly filters `lifecycle = 'active'`
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Each thread should have its own
//! `SqliteStore` instance.

#![warn(missing_docs)]

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use carelog_domain::traits::{AuditSink, DocumentStore, RecordStore, TriageStore};
use carelog_domain::{
    AuditEvent, Document, DocumentCategory, DocumentId, InferenceMode, Lifecycle, Record,
    RecordCategory, RecordId, RecordStatus, ResultId, SessionId, Severity, TriageResult,
    TriageSession, TriageSeverity, TriageSource, TriageStatus, UserId,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entity not found (or not owned by the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

/// SQLite-based implementation of every Carelog store trait
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new store with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Number of audit log entries for an actor (test and ops support)
    pub fn audit_entry_count(&self, actor: UserId) -> Result<u64, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM audit_log WHERE actor = ?1",
            params![id_to_bytes(actor.value())],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Latest audit entry for an actor: (action, resource_type, changes JSON)
    pub fn last_audit_entry(
        &self,
        actor: UserId,
    ) -> Result<Option<(String, String, Option<String>)>, StoreError> {
        let entry = self
            .conn
            .query_row(
                "SELECT action, resource_type, changes FROM audit_log
                 WHERE actor = ?1 ORDER BY id DESC LIMIT 1",
                params![id_to_bytes(actor.value())],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(entry)
    }
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn id_to_bytes(value: u128) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

fn bytes_to_value(bytes: &[u8]) -> Result<u128, StoreError> {
    if bytes.len() != 16 {
        return Err(StoreError::InvalidData(format!(
            "Expected 16 bytes for identifier, got {}",
            bytes.len()
        )));
    }
    let mut arr = [0u8; 16];
    arr.copy_from_slice(bytes);
    Ok(u128::from_be_bytes(arr))
}

fn conversion_error(index: usize, ty: rusqlite::types::Type, e: StoreError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, ty, Box::new(e))
}

fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| StoreError::InvalidData(format!("Bad date '{}': {}", s, e)))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

const RECORD_COLUMNS: &str = "id, owner, category, title, description, date_recorded, provider, \
                              status, severity, attributes, lifecycle, created_at, updated_at";

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Record> {
    use rusqlite::types::Type;

    let id_bytes: Vec<u8> = row.get(0)?;
    let owner_bytes: Vec<u8> = row.get(1)?;
    let category: String = row.get(2)?;
    let date_recorded: Option<String> = row.get(5)?;
    let status: String = row.get(7)?;
    let severity: Option<String> = row.get(8)?;
    let attributes_json: String = row.get(9)?;
    let lifecycle: String = row.get(10)?;

    Ok(Record {
        id: RecordId::from_value(
            bytes_to_value(&id_bytes).map_err(|e| conversion_error(0, Type::Blob, e))?,
        ),
        owner: UserId::from_value(
            bytes_to_value(&owner_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?,
        ),
        category: RecordCategory::parse_str(&category)
            .map_err(|e| conversion_error(2, Type::Text, StoreError::InvalidData(e)))?,
        title: row.get(3)?,
        description: row.get(4)?,
        date_recorded: date_recorded
            .map(|s| parse_date(&s).map_err(|e| conversion_error(5, Type::Text, e)))
            .transpose()?,
        provider: row.get(6)?,
        status: RecordStatus::parse_str(&status)
            .map_err(|e| conversion_error(7, Type::Text, StoreError::InvalidData(e)))?,
        severity: severity
            .map(|s| {
                Severity::parse_str(&s)
                    .map_err(|e| conversion_error(8, Type::Text, StoreError::InvalidData(e)))
            })
            .transpose()?,
        attributes: serde_json::from_str(&attributes_json)
            .map_err(|e| conversion_error(9, Type::Text, StoreError::InvalidData(e.to_string())))?,
        lifecycle: Lifecycle::parse_str(&lifecycle)
            .map_err(|e| conversion_error(10, Type::Text, StoreError::InvalidData(e)))?,
        created_at: row.get::<_, i64>(11)? as u64,
        updated_at: row.get::<_, i64>(12)? as u64,
    })
}

const DOCUMENT_COLUMNS: &str = "id, owner, record_id, category, original_filename, file_size, \
                                extracted_text, lifecycle, created_at";

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    use rusqlite::types::Type;

    let id_bytes: Vec<u8> = row.get(0)?;
    let owner_bytes: Vec<u8> = row.get(1)?;
    let record_bytes: Option<Vec<u8>> = row.get(2)?;
    let category: String = row.get(3)?;
    let lifecycle: String = row.get(7)?;

    Ok(Document {
        id: DocumentId::from_value(
            bytes_to_value(&id_bytes).map_err(|e| conversion_error(0, Type::Blob, e))?,
        ),
        owner: UserId::from_value(
            bytes_to_value(&owner_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?,
        ),
        record: record_bytes
            .map(|b| {
                bytes_to_value(&b)
                    .map(RecordId::from_value)
                    .map_err(|e| conversion_error(2, Type::Blob, e))
            })
            .transpose()?,
        category: DocumentCategory::parse_str(&category)
            .map_err(|e| conversion_error(3, Type::Text, StoreError::InvalidData(e)))?,
        original_filename: row.get(4)?,
        file_size: row.get::<_, i64>(5)? as u64,
        extracted_text: row.get(6)?,
        lifecycle: Lifecycle::parse_str(&lifecycle)
            .map_err(|e| conversion_error(7, Type::Text, StoreError::InvalidData(e)))?,
        created_at: row.get::<_, i64>(8)? as u64,
    })
}

const SESSION_COLUMNS: &str = "id, owner, source, status, symptoms_text, inference_mode, \
                               model_version, device_info, lifecycle, created_at";

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<TriageSession> {
    use rusqlite::types::Type;

    let id_bytes: Vec<u8> = row.get(0)?;
    let owner_bytes: Vec<u8> = row.get(1)?;
    let source: String = row.get(2)?;
    let status: String = row.get(3)?;
    let inference_mode: String = row.get(5)?;
    let device_info: String = row.get(7)?;
    let lifecycle: String = row.get(8)?;

    Ok(TriageSession {
        id: SessionId::from_value(
            bytes_to_value(&id_bytes).map_err(|e| conversion_error(0, Type::Blob, e))?,
        ),
        owner: UserId::from_value(
            bytes_to_value(&owner_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?,
        ),
        source: TriageSource::parse_str(&source)
            .map_err(|e| conversion_error(2, Type::Text, StoreError::InvalidData(e)))?,
        status: TriageStatus::parse_str(&status)
            .map_err(|e| conversion_error(3, Type::Text, StoreError::InvalidData(e)))?,
        symptoms_text: row.get(4)?,
        inference_mode: InferenceMode::parse_str(&inference_mode)
            .map_err(|e| conversion_error(5, Type::Text, StoreError::InvalidData(e)))?,
        model_version: row.get(6)?,
        device_info: serde_json::from_str(&device_info)
            .map_err(|e| conversion_error(7, Type::Text, StoreError::InvalidData(e.to_string())))?,
        lifecycle: Lifecycle::parse_str(&lifecycle)
            .map_err(|e| conversion_error(8, Type::Text, StoreError::InvalidData(e)))?,
        created_at: row.get::<_, i64>(9)? as u64,
    })
}

const RESULT_COLUMNS: &str = "id, session_id, diagnosis, severity, confidence_score, \
                              recommendations, differential_diagnoses, explainability, \
                              raw_model_output, created_at";

fn row_to_result(row: &Row<'_>) -> rusqlite::Result<TriageResult> {
    use rusqlite::types::Type;

    let id_bytes: Vec<u8> = row.get(0)?;
    let session_bytes: Vec<u8> = row.get(1)?;
    let severity: String = row.get(3)?;

    let json_field = |index: usize, raw: String| {
        serde_json::from_str(&raw)
            .map_err(|e| conversion_error(index, Type::Text, StoreError::InvalidData(e.to_string())))
    };

    Ok(TriageResult {
        id: ResultId::from_value(
            bytes_to_value(&id_bytes).map_err(|e| conversion_error(0, Type::Blob, e))?,
        ),
        session: SessionId::from_value(
            bytes_to_value(&session_bytes).map_err(|e| conversion_error(1, Type::Blob, e))?,
        ),
        diagnosis: row.get(2)?,
        severity: TriageSeverity::parse_str(&severity)
            .map_err(|e| conversion_error(3, Type::Text, StoreError::InvalidData(e)))?,
        confidence_score: row.get(4)?,
        recommendations: json_field(5, row.get(5)?)?,
        differential_diagnoses: json_field(6, row.get(6)?)?,
        explainability: json_field(7, row.get(7)?)?,
        raw_model_output: json_field(8, row.get(8)?)?,
        created_at: row.get::<_, i64>(9)? as u64,
    })
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn create_record(&mut self, record: Record) -> Result<RecordId, Self::Error> {
        self.conn.execute(
            "INSERT INTO records (id, owner, category, title, description, date_recorded, \
             provider, status, severity, attributes, lifecycle, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                id_to_bytes(record.id.value()),
                id_to_bytes(record.owner.value()),
                record.category.as_str(),
                record.title,
                record.description,
                record.date_recorded.map(|d| d.to_string()),
                record.provider,
                record.status.as_str(),
                record.severity.map(|s| s.as_str()),
                serde_json::to_string(&record.attributes)?,
                record.lifecycle.as_str(),
                record.created_at as i64,
                record.updated_at as i64,
            ],
        )?;

        Ok(record.id)
    }

    fn get_record(&self, owner: UserId, id: RecordId) -> Result<Option<Record>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM records WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            RECORD_COLUMNS
        );
        let record = self
            .conn
            .query_row(
                &sql,
                params![id_to_bytes(id.value()), id_to_bytes(owner.value())],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn list_active_records(
        &self,
        owner: UserId,
        category: Option<RecordCategory>,
    ) -> Result<Vec<Record>, Self::Error> {
        let mut sql = format!(
            "SELECT {} FROM records WHERE owner = ? AND lifecycle = 'active'",
            RECORD_COLUMNS
        );
        let mut bindings: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(id_to_bytes(owner.value()))];

        if let Some(category) = category {
            sql.push_str(" AND category = ?");
            bindings.push(Box::new(category.as_str()));
        }

        // Ids are UUIDv7 blobs, so id breaks same-second creation ties
        // in creation order
        sql.push_str(" ORDER BY date_recorded DESC, created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let binding_refs: Vec<&dyn rusqlite::ToSql> =
            bindings.iter().map(|b| b.as_ref()).collect();

        let records = stmt
            .query_map(&binding_refs[..], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn update_record(&mut self, record: &Record) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE records SET category = ?3, title = ?4, description = ?5, \
             date_recorded = ?6, provider = ?7, status = ?8, severity = ?9, \
             attributes = ?10, updated_at = ?11
             WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            params![
                id_to_bytes(record.id.value()),
                id_to_bytes(record.owner.value()),
                record.category.as_str(),
                record.title,
                record.description,
                record.date_recorded.map(|d| d.to_string()),
                record.provider,
                record.status.as_str(),
                record.severity.map(|s| s.as_str()),
                serde_json::to_string(&record.attributes)?,
                record.updated_at as i64,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("Record {}", record.id)));
        }
        Ok(())
    }

    fn soft_delete_record(&mut self, owner: UserId, id: RecordId) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE records SET lifecycle = 'deleted', updated_at = ?3
             WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            params![
                id_to_bytes(id.value()),
                id_to_bytes(owner.value()),
                now_secs() as i64
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("Record {}", id)));
        }
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn create_document(&mut self, document: Document) -> Result<DocumentId, Self::Error> {
        self.conn.execute(
            "INSERT INTO documents (id, owner, record_id, category, original_filename, \
             file_size, extracted_text, lifecycle, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id_to_bytes(document.id.value()),
                id_to_bytes(document.owner.value()),
                document.record.map(|r| id_to_bytes(r.value())),
                document.category.as_str(),
                document.original_filename,
                document.file_size as i64,
                document.extracted_text,
                document.lifecycle.as_str(),
                document.created_at as i64,
            ],
        )?;

        Ok(document.id)
    }

    fn get_document(
        &self,
        owner: UserId,
        id: DocumentId,
    ) -> Result<Option<Document>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM documents WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            DOCUMENT_COLUMNS
        );
        let document = self
            .conn
            .query_row(
                &sql,
                params![id_to_bytes(id.value()), id_to_bytes(owner.value())],
                row_to_document,
            )
            .optional()?;
        Ok(document)
    }

    fn list_active_documents(&self, owner: UserId) -> Result<Vec<Document>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM documents WHERE owner = ?1 AND lifecycle = 'active' \
             ORDER BY created_at DESC, id DESC",
            DOCUMENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let documents = stmt
            .query_map(params![id_to_bytes(owner.value())], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(documents)
    }

    fn soft_delete_document(&mut self, owner: UserId, id: DocumentId) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE documents SET lifecycle = 'deleted'
             WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            params![id_to_bytes(id.value()), id_to_bytes(owner.value())],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("Document {}", id)));
        }
        Ok(())
    }

    fn detach_record(&mut self, owner: UserId, record: RecordId) -> Result<(), Self::Error> {
        // Weak back-reference: nulled, never cascaded. Zero affected rows
        // is a valid outcome.
        self.conn.execute(
            "UPDATE documents SET record_id = NULL WHERE owner = ?1 AND record_id = ?2",
            params![id_to_bytes(owner.value()), id_to_bytes(record.value())],
        )?;
        Ok(())
    }
}

impl TriageStore for SqliteStore {
    type Error = StoreError;

    fn create_session(&mut self, session: TriageSession) -> Result<SessionId, Self::Error> {
        self.conn.execute(
            "INSERT INTO triage_sessions (id, owner, source, status, symptoms_text, \
             inference_mode, model_version, device_info, lifecycle, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id_to_bytes(session.id.value()),
                id_to_bytes(session.owner.value()),
                session.source.as_str(),
                session.status.as_str(),
                session.symptoms_text,
                session.inference_mode.as_str(),
                session.model_version,
                serde_json::to_string(&session.device_info)?,
                session.lifecycle.as_str(),
                session.created_at as i64,
            ],
        )?;

        Ok(session.id)
    }

    fn get_session(
        &self,
        owner: UserId,
        id: SessionId,
    ) -> Result<Option<TriageSession>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM triage_sessions \
             WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            SESSION_COLUMNS
        );
        let session = self
            .conn
            .query_row(
                &sql,
                params![id_to_bytes(id.value()), id_to_bytes(owner.value())],
                row_to_session,
            )
            .optional()?;
        Ok(session)
    }

    fn list_sessions(&self, owner: UserId) -> Result<Vec<TriageSession>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM triage_sessions WHERE owner = ?1 AND lifecycle = 'active' \
             ORDER BY created_at DESC, id DESC",
            SESSION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let sessions = stmt
            .query_map(params![id_to_bytes(owner.value())], row_to_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    fn update_session_status(
        &mut self,
        owner: UserId,
        id: SessionId,
        status: TriageStatus,
    ) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE triage_sessions SET status = ?3
             WHERE id = ?1 AND owner = ?2 AND lifecycle = 'active'",
            params![
                id_to_bytes(id.value()),
                id_to_bytes(owner.value()),
                status.as_str()
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(format!("Session {}", id)));
        }
        Ok(())
    }

    fn save_result(&mut self, result: TriageResult) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO triage_results (id, session_id, diagnosis, severity, \
             confidence_score, recommendations, differential_diagnoses, explainability, \
             raw_model_output, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id_to_bytes(result.id.value()),
                id_to_bytes(result.session.value()),
                result.diagnosis,
                result.severity.as_str(),
                result.confidence_score,
                serde_json::to_string(&result.recommendations)?,
                serde_json::to_string(&result.differential_diagnoses)?,
                serde_json::to_string(&result.explainability)?,
                serde_json::to_string(&result.raw_model_output)?,
                result.created_at as i64,
            ],
        )?;
        Ok(())
    }

    fn get_result(&self, session: SessionId) -> Result<Option<TriageResult>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM triage_results WHERE session_id = ?1",
            RESULT_COLUMNS
        );
        let result = self
            .conn
            .query_row(&sql, params![id_to_bytes(session.value())], row_to_result)
            .optional()?;
        Ok(result)
    }
}

impl AuditSink for SqliteStore {
    type Error = StoreError;

    fn record(&mut self, event: AuditEvent) -> Result<(), Self::Error> {
        let changes = if event.changes.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&event.changes)?)
        };

        self.conn.execute(
            "INSERT INTO audit_log (actor, action, resource_type, resource_id, ip_address, \
             user_agent, changes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id_to_bytes(event.actor.value()),
                event.action.as_str(),
                event.resource_type,
                event.resource_id,
                event.ip_address,
                event.user_agent,
                changes,
                now_secs() as i64,
            ],
        )?;
        Ok(())
    }
}
