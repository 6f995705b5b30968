//! Audit events emitted alongside every owner action
//!
//! The audit sink is fire-and-forget: emission failure must never fail the
//! primary operation.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Kind of action being audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Entity created
    Create,
    /// Entity updated
    Update,
    /// Entity soft-deleted
    Delete,
}

impl AuditAction {
    /// Canonical storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }

    /// Parse from the canonical storage string
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s {
            "CREATE" => Ok(AuditAction::Create),
            "UPDATE" => Ok(AuditAction::Update),
            "DELETE" => Ok(AuditAction::Delete),
            _ => Err(format!("Unknown audit action: {}", s)),
        }
    }
}

/// One append-only audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Acting user
    pub actor: UserId,

    /// Action kind
    pub action: AuditAction,

    /// Resource type name ("MedicalRecord", "MedicalDocument", ...)
    pub resource_type: String,

    /// Resource identity, stringified
    pub resource_id: String,

    /// Client IP address, if known
    pub ip_address: Option<String>,

    /// Client user agent, possibly empty
    pub user_agent: String,

    /// Summary of changed fields: field name to stringified new value.
    /// A summary, not a full diff.
    pub changes: Vec<(String, String)>,
}

impl AuditEvent {
    /// Create an event with no change summary
    pub fn new(
        actor: UserId,
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            ip_address: None,
            user_agent: String::new(),
            changes: Vec::new(),
        }
    }

    /// Attach a change summary
    pub fn with_changes(mut self, changes: Vec<(String, String)>) -> Self {
        self.changes = changes;
        self
    }

    /// Attach client request metadata
    pub fn with_client(mut self, ip_address: Option<String>, user_agent: impl Into<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip() {
        for action in [AuditAction::Create, AuditAction::Update, AuditAction::Delete] {
            assert_eq!(AuditAction::parse_str(action.as_str()).unwrap(), action);
        }
        assert!(AuditAction::parse_str("PURGE").is_err());
    }

    #[test]
    fn test_event_builders() {
        let actor = UserId::new();
        let event = AuditEvent::new(actor, AuditAction::Update, "MedicalRecord", "abc")
            .with_changes(vec![("title".into(), "Migraine".into())])
            .with_client(Some("10.0.0.1".into()), "curl/8.0");

        assert_eq!(event.actor, actor);
        assert_eq!(event.changes.len(), 1);
        assert_eq!(event.ip_address.as_deref(), Some("10.0.0.1"));
    }
}
