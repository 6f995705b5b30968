//! Triage command execution

use anyhow::anyhow;
use serde_json::json;

use carelog_domain::{SessionId, UserId};
use carelog_services::{NewSession, NewTriageResult, RequestMeta, TriageService};
use carelog_store::SqliteStore;

use crate::cli::TriageCommand;
use crate::output::Formatter;

/// Execute a triage subcommand
pub fn execute(
    cmd: TriageCommand,
    store: &mut SqliteStore,
    owner: UserId,
    formatter: &Formatter,
    meta: &RequestMeta,
) -> anyhow::Result<()> {
    match cmd {
        TriageCommand::Start(args) => {
            let input = NewSession {
                source: args.source.into(),
                symptoms_text: args.symptoms,
                inference_mode: args.mode.into(),
                model_version: args.model,
                device_info: json!({}),
            };
            let session = TriageService::create_session(store, owner, input, meta)?;
            formatter.print_session_detail(&session, None);
        }
        TriageCommand::List => {
            let sessions = TriageService::list(store, owner)?;
            formatter.print_sessions(&sessions);
        }
        TriageCommand::Show { id } => {
            let (session, result) = TriageService::detail(store, owner, parse_id(&id)?)?;
            formatter.print_session_detail(&session, result.as_ref());
        }
        TriageCommand::Complete(args) => {
            let input = NewTriageResult {
                diagnosis: args.diagnosis,
                severity: args.severity.into(),
                confidence_score: args.confidence,
                recommendations: json!(args.recommendations),
                differential_diagnoses: json!([]),
                explainability: json!({}),
                raw_model_output: json!({}),
            };
            let session_id = parse_id(&args.id)?;
            TriageService::save_result(store, owner, session_id, input, meta)?;
            let (session, result) = TriageService::detail(store, owner, session_id)?;
            formatter.print_session_detail(&session, result.as_ref());
        }
        TriageCommand::Fail { id } => {
            TriageService::mark_failed(store, owner, parse_id(&id)?)?;
            formatter.success("Session marked failed");
        }
    }
    Ok(())
}

fn parse_id(id: &str) -> anyhow::Result<SessionId> {
    SessionId::from_string(id).map_err(|e| anyhow!(e))
}
