//! Integration tests for carelog-store
//!
//! These tests verify the full CRUD cycle for records, documents, triage
//! sessions, and the audit log, including the lifecycle and ownership
//! filters every read path depends on.

use carelog_domain::traits::{AuditSink, DocumentStore, RecordStore, TriageStore};
use carelog_domain::{
    AuditAction, AuditEvent, Document, DocumentCategory, Record, RecordCategory, RecordStatus,
    ResultId, Severity, TriageResult, TriageSession, TriageSeverity, TriageSource, TriageStatus,
    UserId,
};
use carelog_store::SqliteStore;
use chrono::NaiveDate;
use serde_json::json;

fn owner() -> UserId {
    UserId::from_value(42)
}

fn sample_record(title: &str, created_at: u64) -> Record {
    let mut record = Record::new(owner(), RecordCategory::Condition, title, created_at);
    record.description = "Seasonal".to_string();
    record.provider = "Dr. Chen".to_string();
    record.severity = Some(Severity::Mild);
    record.attributes = vec![
        ("onset".to_string(), json!("spring")),
        ("pollen_count".to_string(), json!(120)),
    ];
    record
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_file_backed_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carelog.db");
    let store = SqliteStore::new(&path);
    assert!(store.is_ok());
    assert!(path.exists());
}

#[test]
fn test_create_and_get_record() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut record = sample_record("Hay fever", 1000);
    record.date_recorded = NaiveDate::from_ymd_opt(2024, 4, 2);
    let id = store.create_record(record.clone()).unwrap();
    assert_eq!(id, record.id);

    let retrieved = store.get_record(owner(), id).unwrap().unwrap();
    assert_eq!(retrieved, record, "Round-trip must preserve every field");
}

#[test]
fn test_get_record_ownership_isolation() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let record = sample_record("Hay fever", 1000);
    let id = store.create_record(record).unwrap();

    let stranger = UserId::from_value(7);
    assert!(store.get_record(stranger, id).unwrap().is_none());
}

#[test]
fn test_soft_deleted_record_excluded_from_reads() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let record = sample_record("Hay fever", 1000);
    let id = store.create_record(record).unwrap();

    store.soft_delete_record(owner(), id).unwrap();

    assert!(store.get_record(owner(), id).unwrap().is_none());
    assert!(store.list_active_records(owner(), None).unwrap().is_empty());

    // Deleting twice is NotFound, not a second flip
    assert!(store.soft_delete_record(owner(), id).is_err());
}

#[test]
fn test_list_orders_by_date_then_creation_with_null_dates_last() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut dated_old = sample_record("old", 3000);
    dated_old.date_recorded = NaiveDate::from_ymd_opt(2022, 1, 1);
    let mut dated_new = sample_record("new", 1000);
    dated_new.date_recorded = NaiveDate::from_ymd_opt(2024, 1, 1);
    let undated = sample_record("undated", 2000);

    store.create_record(dated_old).unwrap();
    store.create_record(undated).unwrap();
    store.create_record(dated_new).unwrap();

    let titles: Vec<String> = store
        .list_active_records(owner(), None)
        .unwrap()
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["new", "old", "undated"]);
}

#[test]
fn test_list_filters_by_category() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    store.create_record(sample_record("Hay fever", 1000)).unwrap();
    let medication = Record::new(owner(), RecordCategory::Medication, "Cetirizine", 2000);
    store.create_record(medication).unwrap();

    let conditions = store
        .list_active_records(owner(), Some(RecordCategory::Condition))
        .unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].title, "Hay fever");
}

#[test]
fn test_update_record_persists_fields() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let record = sample_record("Hay fever", 1000);
    store.create_record(record.clone()).unwrap();

    let mut updated = record.clone();
    updated.title = "Allergic rhinitis".to_string();
    updated.status = RecordStatus::Resolved;
    updated.updated_at = 2000;
    store.update_record(&updated).unwrap();

    let retrieved = store.get_record(owner(), record.id).unwrap().unwrap();
    assert_eq!(retrieved.title, "Allergic rhinitis");
    assert_eq!(retrieved.status, RecordStatus::Resolved);
    assert_eq!(retrieved.updated_at, 2000);
}

#[test]
fn test_update_unknown_record_is_not_found() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let record = sample_record("Never stored", 1000);
    assert!(store.update_record(&record).is_err());
}

#[test]
fn test_document_roundtrip_and_ordering() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let older = Document::new(owner(), DocumentCategory::LabReport, "a.pdf", 10, "text a", 1000);
    let newer = Document::new(owner(), DocumentCategory::Imaging, "b.pdf", 20, "text b", 2000);
    store.create_document(older.clone()).unwrap();
    store.create_document(newer.clone()).unwrap();

    let retrieved = store.get_document(owner(), older.id).unwrap().unwrap();
    assert_eq!(retrieved, older);

    // Most recent first
    let listed = store.list_active_documents(owner()).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].original_filename, "b.pdf");
    assert_eq!(listed[1].original_filename, "a.pdf");
}

#[test]
fn test_soft_deleted_document_excluded() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let doc = Document::new(owner(), DocumentCategory::Other, "x.pdf", 1, "t", 1000);
    store.create_document(doc.clone()).unwrap();
    store.soft_delete_document(owner(), doc.id).unwrap();

    assert!(store.get_document(owner(), doc.id).unwrap().is_none());
    assert!(store.list_active_documents(owner()).unwrap().is_empty());
}

#[test]
fn test_detach_record_nulls_weak_reference_only() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let record = sample_record("Anemia", 1000);
    let record_id = store.create_record(record).unwrap();

    let doc = Document::new(owner(), DocumentCategory::LabReport, "cbc.pdf", 5, "t", 1000)
        .with_record(record_id);
    store.create_document(doc.clone()).unwrap();

    store.detach_record(owner(), record_id).unwrap();

    // Document survives with its back-reference nulled
    let retrieved = store.get_document(owner(), doc.id).unwrap().unwrap();
    assert!(retrieved.record.is_none());
    assert_eq!(retrieved.extracted_text, "t");
}

#[test]
fn test_triage_session_and_result_roundtrip() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut session = TriageSession::new(owner(), TriageSource::Text, "headache, fever", 1000);
    session.device_info = json!({"webgpu": true, "ram_gb": 16});
    let session_id = store.create_session(session.clone()).unwrap();

    let retrieved = store.get_session(owner(), session_id).unwrap().unwrap();
    assert_eq!(retrieved, session);
    assert!(store.get_result(session_id).unwrap().is_none());

    let result = TriageResult {
        id: ResultId::new(),
        session: session_id,
        diagnosis: "Likely viral infection".to_string(),
        severity: TriageSeverity::Medium,
        confidence_score: 0.72,
        recommendations: json!(["rest", "hydrate"]),
        differential_diagnoses: json!([{"condition": "influenza", "confidence": 0.6}]),
        explainability: json!({"factors": ["fever"]}),
        raw_model_output: json!({}),
        created_at: 1100,
    };
    store.save_result(result.clone()).unwrap();
    store
        .update_session_status(owner(), session_id, TriageStatus::Completed)
        .unwrap();

    let stored_result = store.get_result(session_id).unwrap().unwrap();
    assert_eq!(stored_result, result);

    let updated = store.get_session(owner(), session_id).unwrap().unwrap();
    assert_eq!(updated.status, TriageStatus::Completed);
}

#[test]
fn test_session_list_most_recent_first() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let first = TriageSession::new(owner(), TriageSource::Text, "one", 1000);
    let second = TriageSession::new(owner(), TriageSource::Image, "two", 2000);
    store.create_session(first).unwrap();
    store.create_session(second).unwrap();

    let sessions = store.list_sessions(owner()).unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].symptoms_text, "two");
}

#[test]
fn test_audit_log_append_and_readback() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    assert_eq!(store.audit_entry_count(owner()).unwrap(), 0);

    let event = AuditEvent::new(owner(), AuditAction::Update, "MedicalRecord", "some-id")
        .with_changes(vec![("title".to_string(), "Migraine".to_string())])
        .with_client(Some("10.0.0.1".to_string()), "test-agent");
    store.record(event).unwrap();

    assert_eq!(store.audit_entry_count(owner()).unwrap(), 1);

    let (action, resource_type, changes) = store.last_audit_entry(owner()).unwrap().unwrap();
    assert_eq!(action, "UPDATE");
    assert_eq!(resource_type, "MedicalRecord");
    assert!(changes.unwrap().contains("Migraine"));
}

#[test]
fn test_audit_event_without_changes_stores_null() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let event = AuditEvent::new(owner(), AuditAction::Delete, "MedicalRecord", "some-id");
    store.record(event).unwrap();

    let (_, _, changes) = store.last_audit_entry(owner()).unwrap().unwrap();
    assert!(changes.is_none());
}
