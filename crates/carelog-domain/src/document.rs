//! Uploaded document entity and its category enumeration

use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, RecordId, UserId};
use crate::lifecycle::Lifecycle;

/// Category of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    /// Lab report
    LabReport,
    /// Discharge summary
    DischargeSummary,
    /// Prescription
    Prescription,
    /// Imaging report
    Imaging,
    /// Referral letter
    Referral,
    /// Insurance document
    Insurance,
    /// Anything else
    Other,
}

impl DocumentCategory {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::LabReport => "LAB_REPORT",
            DocumentCategory::DischargeSummary => "DISCHARGE_SUMMARY",
            DocumentCategory::Prescription => "PRESCRIPTION",
            DocumentCategory::Imaging => "IMAGING",
            DocumentCategory::Referral => "REFERRAL",
            DocumentCategory::Insurance => "INSURANCE",
            DocumentCategory::Other => "OTHER",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "LAB_REPORT" => Ok(DocumentCategory::LabReport),
            "DISCHARGE_SUMMARY" => Ok(DocumentCategory::DischargeSummary),
            "PRESCRIPTION" => Ok(DocumentCategory::Prescription),
            "IMAGING" => Ok(DocumentCategory::Imaging),
            "REFERRAL" => Ok(DocumentCategory::Referral),
            "INSURANCE" => Ok(DocumentCategory::Insurance),
            "OTHER" => Ok(DocumentCategory::Other),
            _ => Err(format!("Unknown document category: {}", s)),
        }
    }

    /// Human-readable label used in document subheadings
    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::LabReport => "Lab Report",
            DocumentCategory::DischargeSummary => "Discharge Summary",
            DocumentCategory::Prescription => "Prescription",
            DocumentCategory::Imaging => "Imaging Report",
            DocumentCategory::Referral => "Referral Letter",
            DocumentCategory::Insurance => "Insurance Document",
            DocumentCategory::Other => "Other",
        }
    }
}

impl Default for DocumentCategory {
    fn default() -> Self {
        DocumentCategory::Other
    }
}

/// An uploaded medical document with best-effort extracted text
///
/// Immutable after creation except for the lifecycle state and the weak
/// record back-reference, which is nulled when the linked record is
/// soft-deleted (never a cascading delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,

    /// Owning patient
    pub owner: UserId,

    /// Weak back-reference to a structured record
    pub record: Option<RecordId>,

    /// Document category
    pub category: DocumentCategory,

    /// Original filename as uploaded
    pub original_filename: String,

    /// Payload size in bytes
    pub file_size: u64,

    /// Text extracted at ingestion time, capped at 50,000 characters.
    /// Extraction failure is represented as an empty string, never as an
    /// error value.
    pub extracted_text: String,

    /// Soft-delete state
    pub lifecycle: Lifecycle,

    /// Creation timestamp (Unix seconds)
    pub created_at: u64,
}

impl Document {
    /// Create a new active document
    pub fn new(
        owner: UserId,
        category: DocumentCategory,
        original_filename: impl Into<String>,
        file_size: u64,
        extracted_text: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            owner,
            record: None,
            category,
            original_filename: original_filename.into(),
            file_size,
            extracted_text: extracted_text.into(),
            lifecycle: Lifecycle::Active,
            created_at,
        }
    }

    /// Attach this document to a structured record
    pub fn with_record(mut self, record: RecordId) -> Self {
        self.record = Some(record);
        self
    }
}
