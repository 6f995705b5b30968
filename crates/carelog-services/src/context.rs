//! Patient context assembly entry point
//!
//! Pulls the owner's active records and documents and renders them into
//! the prompt-ready context string. Assembled fresh on every call; the
//! output is cheap to build and must always reflect current data.

use tracing::debug;

use carelog_context::ContextAssembler;
use carelog_domain::UserId;

use crate::error::ServiceError;
use crate::{store_err, Backend};

/// Stateless assembly of the patient context string
pub struct ContextService;

impl ContextService {
    /// Assemble the owner's medical context for model consumption
    ///
    /// A patient with no active records yields an empty string even if
    /// documents exist.
    pub fn patient_context<S: Backend>(
        store: &S,
        assembler: &ContextAssembler,
        owner: UserId,
    ) -> Result<String, ServiceError> {
        let records = store.list_active_records(owner, None).map_err(store_err)?;
        let documents = store.list_active_documents(owner).map_err(store_err)?;

        let context = assembler.assemble(&records, &documents);
        debug!(
            records = records.len(),
            documents = documents.len(),
            chars = context.chars().count(),
            "Patient context assembled"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{DocumentConfig, DocumentService, DocumentUpload};
    use crate::records::{NewRecord, RecordService};
    use crate::RequestMeta;
    use carelog_domain::{DocumentCategory, RecordCategory, RecordStatus};
    use carelog_extractor::{ExtractorConfig, MockPdfEngine, TextExtractor};
    use carelog_store::SqliteStore;

    fn owner() -> UserId {
        UserId::from_value(1)
    }

    #[test]
    fn test_context_reflects_records_and_documents() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let meta = RequestMeta::default();

        let mut condition = NewRecord::new(RecordCategory::Condition, "Hypertension");
        condition.status = RecordStatus::Chronic;
        RecordService::create(&mut store, owner(), condition, &meta).unwrap();

        let mut medication = NewRecord::new(RecordCategory::Medication, "Lisinopril 10mg");
        medication.attributes = vec![("dosage".to_string(), serde_json::json!("10mg daily"))];
        RecordService::create(&mut store, owner(), medication, &meta).unwrap();

        let extractor = TextExtractor::new(
            Box::new(MockPdfEngine::with_pages(vec![
                "BP 142/90 at rest".to_string()
            ])),
            ExtractorConfig::default(),
        );
        DocumentService::upload(
            &mut store,
            &extractor,
            &DocumentConfig::default(),
            owner(),
            DocumentUpload {
                payload: vec![1, 2, 3],
                filename: "bp-log.pdf".to_string(),
                category: DocumentCategory::Other,
                record: None,
            },
            &meta,
        )
        .unwrap();

        let context =
            ContextService::patient_context(&store, &ContextAssembler::default(), owner())
                .unwrap();

        assert!(context.contains("## Condition / Diagnosis"));
        assert!(context.contains("- Hypertension (Status: CHRONIC)"));
        assert!(context.contains("## Medication"));
        assert!(context.contains("  dosage: 10mg daily"));
        assert!(context.contains("## Uploaded Medical Documents"));
        assert!(context.contains("### bp-log.pdf (Other)"));
        assert!(context.contains("BP 142/90 at rest"));
    }

    #[test]
    fn test_no_records_yields_empty_context_despite_documents() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let extractor = TextExtractor::new(
            Box::new(MockPdfEngine::with_pages(vec!["orphan text".to_string()])),
            ExtractorConfig::default(),
        );
        DocumentService::upload(
            &mut store,
            &extractor,
            &DocumentConfig::default(),
            owner(),
            DocumentUpload {
                payload: vec![1],
                filename: "orphan.pdf".to_string(),
                category: DocumentCategory::Other,
                record: None,
            },
            &RequestMeta::default(),
        )
        .unwrap();

        let context =
            ContextService::patient_context(&store, &ContextAssembler::default(), owner())
                .unwrap();
        assert_eq!(context, "");
    }

    #[test]
    fn test_soft_deleted_record_disappears_from_context() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let meta = RequestMeta::default();

        let kept = RecordService::create(
            &mut store,
            owner(),
            NewRecord::new(RecordCategory::Condition, "Asthma"),
            &meta,
        )
        .unwrap();
        let removed = RecordService::create(
            &mut store,
            owner(),
            NewRecord::new(RecordCategory::Allergy, "Penicillin"),
            &meta,
        )
        .unwrap();
        RecordService::soft_delete(&mut store, owner(), removed.id, &meta).unwrap();

        let context =
            ContextService::patient_context(&store, &ContextAssembler::default(), owner())
                .unwrap();
        assert!(context.contains(&kept.title));
        assert!(!context.contains("Penicillin"));
    }
}
