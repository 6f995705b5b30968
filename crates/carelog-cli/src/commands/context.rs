//! Context command execution

use carelog_context::ContextAssembler;
use carelog_domain::UserId;
use carelog_services::ContextService;
use carelog_store::SqliteStore;

use crate::config::Config;

/// Print the assembled medical context for the acting patient
pub fn execute(store: &SqliteStore, config: &Config, owner: UserId) -> anyhow::Result<()> {
    let assembler = ContextAssembler::new(config.context.clone());
    let context = ContextService::patient_context(store, &assembler, owner)?;
    if context.is_empty() {
        eprintln!("No active records; context is empty");
    } else {
        println!("{}", context);
    }
    Ok(())
}
