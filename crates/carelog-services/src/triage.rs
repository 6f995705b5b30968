//! Triage session lifecycle operations
//!
//! Sessions are created pending, transition through processing, and end
//! completed with a saved result or failed. The result itself comes from
//! the inference client; this layer only validates and persists it.

use tracing::info;

use carelog_domain::{
    AuditAction, AuditEvent, InferenceMode, ResultId, SessionId, TriageResult, TriageSession,
    TriageSeverity, TriageSource, TriageStatus, UserId,
};

use crate::error::ServiceError;
use crate::{emit_audit, now_secs, store_err, Backend, RequestMeta};

/// Input for opening a triage session
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Input modality
    pub source: TriageSource,
    /// Free-text symptom description
    pub symptoms_text: String,
    /// Where inference will run
    pub inference_mode: InferenceMode,
    /// Model identifier reported by the client
    pub model_version: String,
    /// Client device capabilities
    pub device_info: serde_json::Value,
}

impl NewSession {
    /// Text-mode session input with client-side inference defaults
    pub fn text(symptoms_text: impl Into<String>) -> Self {
        Self {
            source: TriageSource::Text,
            symptoms_text: symptoms_text.into(),
            inference_mode: InferenceMode::Client,
            model_version: String::new(),
            device_info: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Inference output submitted for a session
#[derive(Debug, Clone)]
pub struct NewTriageResult {
    /// Primary diagnosis or assessment summary
    pub diagnosis: String,
    /// Assessed severity
    pub severity: TriageSeverity,
    /// Model confidence, must lie in [0.0, 1.0]
    pub confidence_score: f64,
    /// Recommended actions
    pub recommendations: serde_json::Value,
    /// Alternative diagnoses with confidence scores
    pub differential_diagnoses: serde_json::Value,
    /// XAI data
    pub explainability: serde_json::Value,
    /// Raw model response for debugging
    pub raw_model_output: serde_json::Value,
}

/// Stateless operations over triage sessions and results
pub struct TriageService;

impl TriageService {
    /// Open a new pending session and audit the creation
    pub fn create_session<S: Backend>(
        store: &mut S,
        owner: UserId,
        input: NewSession,
        meta: &RequestMeta,
    ) -> Result<TriageSession, ServiceError> {
        let mut session = TriageSession::new(owner, input.source, input.symptoms_text, now_secs());
        session.inference_mode = input.inference_mode;
        session.model_version = input.model_version;
        session.device_info = input.device_info;

        let id = store.create_session(session.clone()).map_err(store_err)?;
        info!(session_id = %id, source = session.source.as_str(), "Triage session opened");

        let event = AuditEvent::new(owner, AuditAction::Create, "TriageSession", id.to_string())
            .with_changes(vec![(
                "source".to_string(),
                session.source.as_str().to_string(),
            )]);
        emit_audit(store, event, meta);

        Ok(session)
    }

    /// List the owner's sessions, most recent first
    pub fn list<S: Backend>(store: &S, owner: UserId) -> Result<Vec<TriageSession>, ServiceError> {
        store.list_sessions(owner).map_err(store_err)
    }

    /// Get a session together with its result, if inference has completed
    pub fn detail<S: Backend>(
        store: &S,
        owner: UserId,
        id: SessionId,
    ) -> Result<(TriageSession, Option<TriageResult>), ServiceError> {
        let session = store
            .get_session(owner, id)
            .map_err(store_err)?
            .ok_or(ServiceError::NotFound)?;
        let result = store.get_result(id).map_err(store_err)?;
        Ok((session, result))
    }

    /// Mark a session as actively running inference
    pub fn mark_processing<S: Backend>(
        store: &mut S,
        owner: UserId,
        id: SessionId,
    ) -> Result<(), ServiceError> {
        Self::require_session(store, owner, id)?;
        store
            .update_session_status(owner, id, TriageStatus::Processing)
            .map_err(store_err)
    }

    /// Persist the inference result and complete the session
    ///
    /// The session must belong to the owner; a foreign or unknown session
    /// is NotFound. A confidence score outside [0.0, 1.0] is rejected.
    pub fn save_result<S: Backend>(
        store: &mut S,
        owner: UserId,
        session_id: SessionId,
        input: NewTriageResult,
        meta: &RequestMeta,
    ) -> Result<TriageResult, ServiceError> {
        if !(0.0..=1.0).contains(&input.confidence_score) {
            return Err(ServiceError::Validation(format!(
                "Confidence score {} outside [0.0, 1.0]",
                input.confidence_score
            )));
        }
        Self::require_session(store, owner, session_id)?;

        let result = TriageResult {
            id: ResultId::new(),
            session: session_id,
            diagnosis: input.diagnosis,
            severity: input.severity,
            confidence_score: input.confidence_score,
            recommendations: input.recommendations,
            differential_diagnoses: input.differential_diagnoses,
            explainability: input.explainability,
            raw_model_output: input.raw_model_output,
            created_at: now_secs(),
        };

        store.save_result(result.clone()).map_err(store_err)?;
        store
            .update_session_status(owner, session_id, TriageStatus::Completed)
            .map_err(store_err)?;
        info!(
            session_id = %session_id,
            severity = result.severity.as_str(),
            "Triage result saved"
        );

        let event = AuditEvent::new(
            owner,
            AuditAction::Create,
            "TriageResult",
            result.id.to_string(),
        )
        .with_changes(vec![(
            "severity".to_string(),
            result.severity.as_str().to_string(),
        )]);
        emit_audit(store, event, meta);

        Ok(result)
    }

    /// Mark a session as failed after an inference error
    pub fn mark_failed<S: Backend>(
        store: &mut S,
        owner: UserId,
        id: SessionId,
    ) -> Result<(), ServiceError> {
        Self::require_session(store, owner, id)?;
        store
            .update_session_status(owner, id, TriageStatus::Failed)
            .map_err(store_err)?;
        info!(session_id = %id, "Triage session failed");
        Ok(())
    }

    fn require_session<S: Backend>(
        store: &S,
        owner: UserId,
        id: SessionId,
    ) -> Result<TriageSession, ServiceError> {
        store
            .get_session(owner, id)
            .map_err(store_err)?
            .ok_or(ServiceError::NotFound)
    }
}
