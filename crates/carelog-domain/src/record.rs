//! Medical record entities and their closed enumerations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{RecordId, UserId};
use crate::lifecycle::Lifecycle;

/// Ordered key/value attributes attached to a record (dosage, frequency,
/// measured values, ...). Insertion order is part of the output contract,
/// so this is a pair vector rather than a map.
pub type Attributes = Vec<(String, serde_json::Value)>;

/// Category of a structured medical record
///
/// Declaration order is the presentation order used when grouping records
/// in the assembled context. It is intentionally not alphabetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordCategory {
    /// Condition or diagnosis
    Condition,
    /// Medication
    Medication,
    /// Allergy
    Allergy,
    /// Procedure
    Procedure,
    /// Vital sign
    Vital,
    /// Lab result
    LabResult,
    /// Immunization
    Immunization,
    /// Family history
    FamilyHistory,
    /// Anything else
    Other,
}

impl RecordCategory {
    /// All categories in presentation order
    pub const ALL: [RecordCategory; 9] = [
        RecordCategory::Condition,
        RecordCategory::Medication,
        RecordCategory::Allergy,
        RecordCategory::Procedure,
        RecordCategory::Vital,
        RecordCategory::LabResult,
        RecordCategory::Immunization,
        RecordCategory::FamilyHistory,
        RecordCategory::Other,
    ];

    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Condition => "CONDITION",
            RecordCategory::Medication => "MEDICATION",
            RecordCategory::Allergy => "ALLERGY",
            RecordCategory::Procedure => "PROCEDURE",
            RecordCategory::Vital => "VITAL",
            RecordCategory::LabResult => "LAB_RESULT",
            RecordCategory::Immunization => "IMMUNIZATION",
            RecordCategory::FamilyHistory => "FAMILY_HISTORY",
            RecordCategory::Other => "OTHER",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "CONDITION" => Ok(RecordCategory::Condition),
            "MEDICATION" => Ok(RecordCategory::Medication),
            "ALLERGY" => Ok(RecordCategory::Allergy),
            "PROCEDURE" => Ok(RecordCategory::Procedure),
            "VITAL" => Ok(RecordCategory::Vital),
            "LAB_RESULT" => Ok(RecordCategory::LabResult),
            "IMMUNIZATION" => Ok(RecordCategory::Immunization),
            "FAMILY_HISTORY" => Ok(RecordCategory::FamilyHistory),
            "OTHER" => Ok(RecordCategory::Other),
            _ => Err(format!("Unknown record category: {}", s)),
        }
    }

    /// Human-readable label used for section headings
    pub fn label(&self) -> &'static str {
        match self {
            RecordCategory::Condition => "Condition / Diagnosis",
            RecordCategory::Medication => "Medication",
            RecordCategory::Allergy => "Allergy",
            RecordCategory::Procedure => "Procedure",
            RecordCategory::Vital => "Vital Sign",
            RecordCategory::LabResult => "Lab Result",
            RecordCategory::Immunization => "Immunization",
            RecordCategory::FamilyHistory => "Family History",
            RecordCategory::Other => "Other",
        }
    }
}

/// Status of a medical record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Currently active
    Active,
    /// Resolved in the past
    Resolved,
    /// Ongoing chronic condition
    Chronic,
}

impl RecordStatus {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "ACTIVE",
            RecordStatus::Resolved => "RESOLVED",
            RecordStatus::Chronic => "CHRONIC",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "ACTIVE" => Ok(RecordStatus::Active),
            "RESOLVED" => Ok(RecordStatus::Resolved),
            "CHRONIC" => Ok(RecordStatus::Chronic),
            _ => Err(format!("Unknown record status: {}", s)),
        }
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Active
    }
}

/// Severity of a condition; absence is modeled as `Option<Severity>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Mild
    Mild,
    /// Moderate
    Moderate,
    /// Severe
    Severe,
}

impl Severity {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "MILD",
            Severity::Moderate => "MODERATE",
            Severity::Severe => "SEVERE",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "MILD" => Ok(Severity::Mild),
            "MODERATE" => Ok(Severity::Moderate),
            "SEVERE" => Ok(Severity::Severe),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A structured medical record entry owned by a patient
///
/// Records are mutated only by their owner and never hard-deleted;
/// deletion flips the lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: RecordId,

    /// Owning patient
    pub owner: UserId,

    /// Category, always present and drawn from the closed enumeration
    pub category: RecordCategory,

    /// Short title ("Hypertension", "Metformin 500mg", ...)
    pub title: String,

    /// Long free-text description, possibly empty
    pub description: String,

    /// When the condition was diagnosed or the event occurred
    pub date_recorded: Option<NaiveDate>,

    /// Healthcare provider or facility name, possibly empty
    pub provider: String,

    /// Record status
    pub status: RecordStatus,

    /// Severity, if assessed
    pub severity: Option<Severity>,

    /// Flexible ordered key/value data (dosage, frequency, values, ...)
    pub attributes: Attributes,

    /// Soft-delete state
    pub lifecycle: Lifecycle,

    /// Creation timestamp (Unix seconds)
    pub created_at: u64,

    /// Last update timestamp (Unix seconds)
    pub updated_at: u64,
}

impl Record {
    /// Create a new active record with the given core fields
    pub fn new(
        owner: UserId,
        category: RecordCategory,
        title: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            owner,
            category,
            title: title.into(),
            description: String::new(),
            date_recorded: None,
            provider: String::new(),
            status: RecordStatus::default(),
            severity: None,
            attributes: Vec::new(),
            lifecycle: Lifecycle::Active,
            created_at,
            updated_at: created_at,
        }
    }
}
