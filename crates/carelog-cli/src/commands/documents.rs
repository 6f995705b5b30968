//! Document command execution

use anyhow::{anyhow, Context};

use carelog_domain::{DocumentId, RecordId, UserId};
use carelog_extractor::TextExtractor;
use carelog_services::{DocumentService, DocumentUpload, RequestMeta};
use carelog_store::SqliteStore;

use crate::cli::DocumentCommand;
use crate::config::Config;
use crate::output::Formatter;

/// Execute a document subcommand
pub fn execute(
    cmd: DocumentCommand,
    store: &mut SqliteStore,
    config: &Config,
    owner: UserId,
    formatter: &Formatter,
    meta: &RequestMeta,
) -> anyhow::Result<()> {
    match cmd {
        DocumentCommand::Upload(args) => {
            let payload = std::fs::read(&args.file)
                .with_context(|| format!("Failed to read {}", args.file.display()))?;
            let filename = args
                .file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow!("File path has no usable name"))?
                .to_string();
            let record = args
                .record
                .as_deref()
                .map(|id| RecordId::from_string(id).map_err(|e| anyhow!(e)))
                .transpose()?;

            let extractor = TextExtractor::with_default_engine(config.extractor.clone());
            let upload = DocumentUpload {
                payload,
                filename,
                category: args.category.into(),
                record,
            };
            let document =
                DocumentService::upload(store, &extractor, &config.documents, owner, upload, meta)?;
            formatter.print_document(&document);
        }
        DocumentCommand::List => {
            let documents = DocumentService::list(store, owner)?;
            formatter.print_documents(&documents);
        }
        DocumentCommand::Show { id } => {
            let document = DocumentService::get(store, owner, parse_id(&id)?)?;
            formatter.print_document(&document);
        }
        DocumentCommand::Delete { id } => {
            DocumentService::soft_delete(store, owner, parse_id(&id)?, meta)?;
            formatter.success("Document deleted");
        }
    }
    Ok(())
}

fn parse_id(id: &str) -> anyhow::Result<DocumentId> {
    DocumentId::from_string(id).map_err(|e| anyhow!(e))
}
