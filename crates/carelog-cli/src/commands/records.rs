//! Record command execution

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde_json::Map;

use carelog_domain::{RecordId, UserId};
use carelog_services::{NewRecord, RecordService, RequestMeta};
use carelog_store::SqliteStore;

use crate::cli::RecordCommand;
use crate::output::Formatter;

/// Execute a record subcommand
pub fn execute(
    cmd: RecordCommand,
    store: &mut SqliteStore,
    owner: UserId,
    formatter: &Formatter,
    meta: &RequestMeta,
) -> anyhow::Result<()> {
    match cmd {
        RecordCommand::Add(args) => {
            let mut input = NewRecord::new(args.category.into(), args.title);
            input.description = args.description;
            input.provider = args.provider;
            input.status = args.status.into();
            input.severity = args.severity.map(Into::into);
            if let Some(date) = args.date {
                input.date_recorded = Some(
                    NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", date))?,
                );
            }
            input.attributes = super::parse_pairs(&args.attrs)?;

            let record = RecordService::create(store, owner, input, meta)?;
            formatter.print_record(&record);
        }
        RecordCommand::List(args) => {
            let records = RecordService::list(store, owner, args.category.map(Into::into))?;
            formatter.print_records(&records);
        }
        RecordCommand::Show { id } => {
            let record = RecordService::get(store, owner, parse_id(&id)?)?;
            formatter.print_record(&record);
        }
        RecordCommand::Update(args) => {
            let updates: Map<String, serde_json::Value> =
                super::parse_pairs(&args.sets)?.into_iter().collect();
            let record = RecordService::update(store, owner, parse_id(&args.id)?, &updates, meta)?;
            formatter.print_record(&record);
        }
        RecordCommand::Delete { id } => {
            RecordService::soft_delete(store, owner, parse_id(&id)?, meta)?;
            formatter.success("Record deleted");
        }
    }
    Ok(())
}

fn parse_id(id: &str) -> anyhow::Result<RecordId> {
    RecordId::from_string(id).map_err(|e| anyhow!(e))
}
