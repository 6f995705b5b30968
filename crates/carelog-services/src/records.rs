//! Structured medical record operations

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::info;

use carelog_domain::{
    AuditAction, AuditEvent, Attributes, Record, RecordCategory, RecordId, RecordStatus, Severity,
    UserId,
};

use crate::error::ServiceError;
use crate::{emit_audit, now_secs, store_err, Backend, RequestMeta};

/// Fields a caller may change through [`RecordService::update`]. Keys
/// outside this list are silently ignored.
const UPDATABLE_FIELDS: [&str; 8] = [
    "title",
    "description",
    "category",
    "date_recorded",
    "provider",
    "status",
    "severity",
    "attributes",
];

/// Input for creating a record
#[derive(Debug, Clone)]
pub struct NewRecord {
    /// Record category
    pub category: RecordCategory,
    /// Short title, must be non-empty
    pub title: String,
    /// Long free-text description
    pub description: String,
    /// When the condition was diagnosed or the event occurred
    pub date_recorded: Option<NaiveDate>,
    /// Healthcare provider or facility name
    pub provider: String,
    /// Record status
    pub status: RecordStatus,
    /// Severity, if assessed
    pub severity: Option<Severity>,
    /// Ordered key/value attributes
    pub attributes: Attributes,
}

impl NewRecord {
    /// Input with the required fields set and everything else empty
    pub fn new(category: RecordCategory, title: impl Into<String>) -> Self {
        Self {
            category,
            title: title.into(),
            description: String::new(),
            date_recorded: None,
            provider: String::new(),
            status: RecordStatus::default(),
            severity: None,
            attributes: Vec::new(),
        }
    }
}

/// Stateless operations over structured medical records
pub struct RecordService;

impl RecordService {
    /// Create a record owned by `owner` and audit the creation
    pub fn create<S: Backend>(
        store: &mut S,
        owner: UserId,
        input: NewRecord,
        meta: &RequestMeta,
    ) -> Result<Record, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::Validation("Title must not be empty".into()));
        }

        let mut record = Record::new(owner, input.category, input.title, now_secs());
        record.description = input.description;
        record.date_recorded = input.date_recorded;
        record.provider = input.provider;
        record.status = input.status;
        record.severity = input.severity;
        record.attributes = input.attributes;

        let id = store.create_record(record.clone()).map_err(store_err)?;
        info!(record_id = %id, category = record.category.as_str(), "Record created");

        let event = AuditEvent::new(owner, AuditAction::Create, "MedicalRecord", id.to_string())
            .with_changes(vec![
                ("category".to_string(), record.category.as_str().to_string()),
                ("title".to_string(), record.title.clone()),
            ]);
        emit_audit(store, event, meta);

        Ok(record)
    }

    /// Get one of the owner's active records
    pub fn get<S: Backend>(
        store: &S,
        owner: UserId,
        id: RecordId,
    ) -> Result<Record, ServiceError> {
        store
            .get_record(owner, id)
            .map_err(store_err)?
            .ok_or(ServiceError::NotFound)
    }

    /// List the owner's active records, optionally filtered by category
    pub fn list<S: Backend>(
        store: &S,
        owner: UserId,
        category: Option<RecordCategory>,
    ) -> Result<Vec<Record>, ServiceError> {
        store.list_active_records(owner, category).map_err(store_err)
    }

    /// Apply a partial update from a string-keyed value map
    ///
    /// Only the fixed set of updatable fields is consulted; unknown keys
    /// are ignored without error. A value that fails to parse into its
    /// field's type rejects the whole update. The audit event carries a
    /// field-to-stringified-value summary of what changed.
    pub fn update<S: Backend>(
        store: &mut S,
        owner: UserId,
        id: RecordId,
        updates: &Map<String, Value>,
        meta: &RequestMeta,
    ) -> Result<Record, ServiceError> {
        let mut record = Self::get(store, owner, id)?;

        let mut changes: Vec<(String, String)> = Vec::new();
        for field in UPDATABLE_FIELDS {
            let Some(value) = updates.get(field) else {
                continue;
            };
            apply_field(&mut record, field, value)?;
            changes.push((field.to_string(), summarize_value(value)));
        }

        // Nothing recognized changed: skip the write and the audit event
        if changes.is_empty() {
            return Ok(record);
        }

        record.updated_at = now_secs();
        store.update_record(&record).map_err(store_err)?;
        info!(record_id = %id, fields = changes.len(), "Record updated");

        let event = AuditEvent::new(owner, AuditAction::Update, "MedicalRecord", id.to_string())
            .with_changes(changes);
        emit_audit(store, event, meta);

        Ok(record)
    }

    /// Soft-delete a record and null the back-reference on any documents
    /// attached to it. The documents themselves survive.
    pub fn soft_delete<S: Backend>(
        store: &mut S,
        owner: UserId,
        id: RecordId,
        meta: &RequestMeta,
    ) -> Result<(), ServiceError> {
        // Resolve first so an unknown or foreign id is NotFound rather
        // than an opaque store error
        Self::get(store, owner, id)?;

        store.soft_delete_record(owner, id).map_err(store_err)?;
        store.detach_record(owner, id).map_err(store_err)?;
        info!(record_id = %id, "Record soft-deleted");

        let event = AuditEvent::new(owner, AuditAction::Delete, "MedicalRecord", id.to_string());
        emit_audit(store, event, meta);

        Ok(())
    }
}

/// Apply one field from the update map onto the record
fn apply_field(record: &mut Record, field: &str, value: &Value) -> Result<(), ServiceError> {
    match field {
        "title" => {
            let title = expect_string(field, value)?;
            if title.trim().is_empty() {
                return Err(ServiceError::Validation("Title must not be empty".into()));
            }
            record.title = title;
        }
        "description" => record.description = expect_string(field, value)?,
        "provider" => record.provider = expect_string(field, value)?,
        "category" => {
            record.category = RecordCategory::parse_str(&expect_string(field, value)?)
                .map_err(ServiceError::Validation)?;
        }
        "status" => {
            record.status = RecordStatus::parse_str(&expect_string(field, value)?)
                .map_err(ServiceError::Validation)?;
        }
        "severity" => {
            record.severity = match value {
                Value::Null => None,
                other => Some(
                    Severity::parse_str(&expect_string(field, other)?)
                        .map_err(ServiceError::Validation)?,
                ),
            };
        }
        "date_recorded" => {
            record.date_recorded = match value {
                Value::Null => None,
                other => {
                    let s = expect_string(field, other)?;
                    Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                        ServiceError::Validation(format!("Invalid date '{}': {}", s, e))
                    })?)
                }
            };
        }
        "attributes" => record.attributes = parse_attributes(value)?,
        _ => unreachable!("field outside the updatable set"),
    }
    Ok(())
}

fn expect_string(field: &str, value: &Value) -> Result<String, ServiceError> {
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| ServiceError::Validation(format!("Field '{}' must be a string", field)))
}

/// Parse attributes from an array of `[key, value]` pairs. A pair array
/// rather than an object, so insertion order survives the wire format.
fn parse_attributes(value: &Value) -> Result<Attributes, ServiceError> {
    let pairs = value.as_array().ok_or_else(|| {
        ServiceError::Validation("Attributes must be an array of [key, value] pairs".into())
    })?;

    let mut attributes = Attributes::with_capacity(pairs.len());
    for pair in pairs {
        let entry = pair.as_array().filter(|p| p.len() == 2).ok_or_else(|| {
            ServiceError::Validation("Each attribute must be a [key, value] pair".into())
        })?;
        let key = entry[0]
            .as_str()
            .ok_or_else(|| ServiceError::Validation("Attribute keys must be strings".into()))?;
        attributes.push((key.to_string(), entry[1].clone()));
    }
    Ok(attributes)
}

/// Stringify a new value for the audit change summary. Strings are kept
/// bare; everything else renders as compact JSON.
fn summarize_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
