//! Triage session and result entities for the AI symptom-triage flow

use serde::{Deserialize, Serialize};

use crate::ids::{ResultId, SessionId, UserId};
use crate::lifecycle::Lifecycle;

/// Input modality of a triage session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageSource {
    /// Free-text symptom description
    Text,
    /// Image upload
    Image,
    /// Text plus images
    Multimodal,
}

impl TriageSource {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageSource::Text => "TEXT",
            TriageSource::Image => "IMAGE",
            TriageSource::Multimodal => "MULTIMODAL",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "TEXT" => Ok(TriageSource::Text),
            "IMAGE" => Ok(TriageSource::Image),
            "MULTIMODAL" => Ok(TriageSource::Multimodal),
            _ => Err(format!("Unknown triage source: {}", s)),
        }
    }
}

impl Default for TriageSource {
    fn default() -> Self {
        TriageSource::Text
    }
}

/// Processing status of a triage session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageStatus {
    /// Created, no inference yet
    Pending,
    /// Inference in progress
    Processing,
    /// Result saved
    Completed,
    /// Inference failed
    Failed,
}

impl TriageStatus {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageStatus::Pending => "PENDING",
            TriageStatus::Processing => "PROCESSING",
            TriageStatus::Completed => "COMPLETED",
            TriageStatus::Failed => "FAILED",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "PENDING" => Ok(TriageStatus::Pending),
            "PROCESSING" => Ok(TriageStatus::Processing),
            "COMPLETED" => Ok(TriageStatus::Completed),
            "FAILED" => Ok(TriageStatus::Failed),
            _ => Err(format!("Unknown triage status: {}", s)),
        }
    }
}

/// Where inference ran: on-device or server fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InferenceMode {
    /// In-browser / on-device inference
    Client,
    /// Server-side fallback
    Server,
}

impl InferenceMode {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceMode::Client => "CLIENT",
            InferenceMode::Server => "SERVER",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "CLIENT" => Ok(InferenceMode::Client),
            "SERVER" => Ok(InferenceMode::Server),
            _ => Err(format!("Unknown inference mode: {}", s)),
        }
    }
}

/// Severity assessed by the triage model
///
/// Distinct from [`crate::Severity`], which grades recorded conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageSeverity {
    /// Low urgency
    Low,
    /// Medium urgency
    Medium,
    /// High urgency
    High,
    /// Emergency
    Critical,
}

impl TriageSeverity {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageSeverity::Low => "LOW",
            TriageSeverity::Medium => "MEDIUM",
            TriageSeverity::High => "HIGH",
            TriageSeverity::Critical => "CRITICAL",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "LOW" => Ok(TriageSeverity::Low),
            "MEDIUM" => Ok(TriageSeverity::Medium),
            "HIGH" => Ok(TriageSeverity::High),
            "CRITICAL" => Ok(TriageSeverity::Critical),
            _ => Err(format!("Unknown triage severity: {}", s)),
        }
    }
}

/// A single triage session initiated by a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageSession {
    /// Unique identifier
    pub id: SessionId,

    /// Owning patient
    pub owner: UserId,

    /// Input modality
    pub source: TriageSource,

    /// Processing status
    pub status: TriageStatus,

    /// Free-text symptom description, possibly empty
    pub symptoms_text: String,

    /// Whether inference ran on-device or server fallback
    pub inference_mode: InferenceMode,

    /// Model identifier reported by the client, possibly empty
    pub model_version: String,

    /// Client device capabilities (WebGPU, RAM, ...)
    pub device_info: serde_json::Value,

    /// Soft-delete state
    pub lifecycle: Lifecycle,

    /// Creation timestamp (Unix seconds)
    pub created_at: u64,
}

impl TriageSession {
    /// Create a new pending session
    pub fn new(owner: UserId, source: TriageSource, symptoms_text: impl Into<String>, created_at: u64) -> Self {
        Self {
            id: SessionId::new(),
            owner,
            source,
            status: TriageStatus::Pending,
            symptoms_text: symptoms_text.into(),
            inference_mode: InferenceMode::Client,
            model_version: String::new(),
            device_info: serde_json::Value::Object(serde_json::Map::new()),
            lifecycle: Lifecycle::Active,
            created_at,
        }
    }
}

/// AI inference output for a triage session (1:1 with the session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    /// Unique identifier
    pub id: ResultId,

    /// Session this result belongs to
    pub session: SessionId,

    /// Primary diagnosis or assessment summary
    pub diagnosis: String,

    /// Assessed severity
    pub severity: TriageSeverity,

    /// Model confidence, 0.0 to 1.0
    pub confidence_score: f64,

    /// Recommended actions
    pub recommendations: serde_json::Value,

    /// Alternative diagnoses with confidence scores
    pub differential_diagnoses: serde_json::Value,

    /// XAI data: contributing factors, feature importance
    pub explainability: serde_json::Value,

    /// Raw model response for debugging
    pub raw_model_output: serde_json::Value,

    /// Creation timestamp (Unix seconds)
    pub created_at: u64,
}
