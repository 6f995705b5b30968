//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use carelog_domain::{
    DocumentCategory, InferenceMode, RecordCategory, RecordStatus, Severity, TriageSeverity,
    TriageSource,
};

/// Carelog CLI - manage medical records, documents, and triage sessions
#[derive(Debug, Parser)]
#[command(name = "carelog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Acting patient id (UUID)
    #[arg(short, long, global = true, env = "CARELOG_USER")]
    pub user: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage structured medical records
    #[command(subcommand)]
    Record(RecordCommand),

    /// Manage uploaded documents
    #[command(subcommand)]
    Document(DocumentCommand),

    /// Print the assembled medical context for the acting patient
    Context,

    /// Manage AI triage sessions
    #[command(subcommand)]
    Triage(TriageCommand),

    /// Generate a fresh patient id
    NewUser,
}

/// Record subcommands
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Add a new record
    Add(AddRecordArgs),

    /// List records, optionally filtered by category
    List(ListRecordsArgs),

    /// Show one record
    Show {
        /// Record id
        id: String,
    },

    /// Update fields on a record
    Update(UpdateRecordArgs),

    /// Soft-delete a record
    Delete {
        /// Record id
        id: String,
    },
}

/// Arguments for adding a record
#[derive(Debug, Parser)]
pub struct AddRecordArgs {
    /// Record category
    #[arg(value_enum)]
    pub category: CategoryArg,

    /// Short title ("Hypertension", "Metformin 500mg", ...)
    pub title: String,

    /// Long free-text description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Date the condition was diagnosed or the event occurred (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Healthcare provider or facility name
    #[arg(short, long, default_value = "")]
    pub provider: String,

    /// Record status
    #[arg(short, long, value_enum, default_value = "active")]
    pub status: StatusArg,

    /// Severity, if assessed
    #[arg(long, value_enum)]
    pub severity: Option<SeverityArg>,

    /// Attribute as KEY=VALUE; repeatable, order preserved. Values are
    /// parsed as JSON when possible, otherwise taken as plain strings.
    #[arg(short, long = "attr", value_name = "KEY=VALUE")]
    pub attrs: Vec<String>,
}

/// Arguments for listing records
#[derive(Debug, Parser)]
pub struct ListRecordsArgs {
    /// Filter by category
    #[arg(short = 'C', long, value_enum)]
    pub category: Option<CategoryArg>,
}

/// Arguments for updating a record
#[derive(Debug, Parser)]
pub struct UpdateRecordArgs {
    /// Record id
    pub id: String,

    /// Field update as FIELD=VALUE; repeatable. Values are parsed as
    /// JSON when possible, otherwise taken as plain strings. Fields
    /// outside the updatable set are ignored.
    #[arg(short, long = "set", value_name = "FIELD=VALUE", required = true)]
    pub sets: Vec<String>,
}

/// Document subcommands
#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Upload a document and extract its text
    Upload(UploadArgs),

    /// List documents
    List,

    /// Show one document, including extracted text
    Show {
        /// Document id
        id: String,
    },

    /// Soft-delete a document
    Delete {
        /// Document id
        id: String,
    },
}

/// Arguments for uploading a document
#[derive(Debug, Parser)]
pub struct UploadArgs {
    /// Path to the file to upload
    pub file: PathBuf,

    /// Document category
    #[arg(short = 'C', long, value_enum, default_value = "other")]
    pub category: DocCategoryArg,

    /// Record id to attach the document to
    #[arg(short, long)]
    pub record: Option<String>,
}

/// Triage subcommands
#[derive(Debug, Subcommand)]
pub enum TriageCommand {
    /// Open a new triage session
    Start(StartTriageArgs),

    /// List sessions
    List,

    /// Show one session and its result, if completed
    Show {
        /// Session id
        id: String,
    },

    /// Save an inference result and complete the session
    Complete(CompleteTriageArgs),

    /// Mark a session as failed
    Fail {
        /// Session id
        id: String,
    },
}

/// Arguments for starting a triage session
#[derive(Debug, Parser)]
pub struct StartTriageArgs {
    /// Free-text symptom description
    pub symptoms: String,

    /// Input modality
    #[arg(short, long, value_enum, default_value = "text")]
    pub source: SourceArg,

    /// Where inference runs
    #[arg(short, long, value_enum, default_value = "client")]
    pub mode: ModeArg,

    /// Model identifier reported by the client
    #[arg(long, default_value = "")]
    pub model: String,
}

/// Arguments for completing a triage session
#[derive(Debug, Parser)]
pub struct CompleteTriageArgs {
    /// Session id
    pub id: String,

    /// Primary diagnosis or assessment summary
    #[arg(short, long)]
    pub diagnosis: String,

    /// Assessed severity
    #[arg(short, long, value_enum)]
    pub severity: TriageSeverityArg,

    /// Model confidence (0.0-1.0)
    #[arg(long)]
    pub confidence: f64,

    /// Recommended actions; repeatable
    #[arg(short, long = "recommend")]
    pub recommendations: Vec<String>,
}

/// Record category argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CategoryArg {
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

/// Record status argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    /// Currently active
    Active,
    /// Resolved in the past
    Resolved,
    /// Ongoing chronic condition
    Chronic,
}

/// Severity argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SeverityArg {
    /// Mild
    Mild,
    /// Moderate
    Moderate,
    /// Severe
    Severe,
}

/// Document category argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DocCategoryArg {
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

/// Triage source argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SourceArg {
    /// Free-text symptoms
    Text,
    /// Image upload
    Image,
    /// Text plus images
    Multimodal,
}

/// Inference mode argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// In-browser / on-device inference
    Client,
    /// Server-side fallback
    Server,
}

/// Triage severity argument
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TriageSeverityArg {
    /// Low urgency
    Low,
    /// Medium urgency
    Medium,
    /// High urgency
    High,
    /// Emergency
    Critical,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<CategoryArg> for RecordCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Condition => RecordCategory::Condition,
            CategoryArg::Medication => RecordCategory::Medication,
            CategoryArg::Allergy => RecordCategory::Allergy,
            CategoryArg::Procedure => RecordCategory::Procedure,
            CategoryArg::Vital => RecordCategory::Vital,
            CategoryArg::LabResult => RecordCategory::LabResult,
            CategoryArg::Immunization => RecordCategory::Immunization,
            CategoryArg::FamilyHistory => RecordCategory::FamilyHistory,
            CategoryArg::Other => RecordCategory::Other,
        }
    }
}

impl From<StatusArg> for RecordStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => RecordStatus::Active,
            StatusArg::Resolved => RecordStatus::Resolved,
            StatusArg::Chronic => RecordStatus::Chronic,
        }
    }
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Mild => Severity::Mild,
            SeverityArg::Moderate => Severity::Moderate,
            SeverityArg::Severe => Severity::Severe,
        }
    }
}

impl From<DocCategoryArg> for DocumentCategory {
    fn from(arg: DocCategoryArg) -> Self {
        match arg {
            DocCategoryArg::LabReport => DocumentCategory::LabReport,
            DocCategoryArg::DischargeSummary => DocumentCategory::DischargeSummary,
            DocCategoryArg::Prescription => DocumentCategory::Prescription,
            DocCategoryArg::Imaging => DocumentCategory::Imaging,
            DocCategoryArg::Referral => DocumentCategory::Referral,
            DocCategoryArg::Insurance => DocumentCategory::Insurance,
            DocCategoryArg::Other => DocumentCategory::Other,
        }
    }
}

impl From<SourceArg> for TriageSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Text => TriageSource::Text,
            SourceArg::Image => TriageSource::Image,
            SourceArg::Multimodal => TriageSource::Multimodal,
        }
    }
}

impl From<ModeArg> for InferenceMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Client => InferenceMode::Client,
            ModeArg::Server => InferenceMode::Server,
        }
    }
}

impl From<TriageSeverityArg> for TriageSeverity {
    fn from(arg: TriageSeverityArg) -> Self {
        match arg {
            TriageSeverityArg::Low => TriageSeverity::Low,
            TriageSeverityArg::Medium => TriageSeverity::Medium,
            TriageSeverityArg::High => TriageSeverity::High,
            TriageSeverityArg::Critical => TriageSeverity::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_add_parses() {
        let cli = Cli::parse_from([
            "carelog",
            "record",
            "add",
            "condition",
            "Hypertension",
            "--status",
            "chronic",
            "--attr",
            "onset=2023",
        ]);
        match cli.command {
            Command::Record(RecordCommand::Add(args)) => {
                assert_eq!(args.title, "Hypertension");
                assert!(matches!(args.status, StatusArg::Chronic));
                assert_eq!(args.attrs, vec!["onset=2023"]);
            }
            _ => panic!("Expected record add"),
        }
    }

    #[test]
    fn test_global_user_flag() {
        let cli = Cli::parse_from(["carelog", "--user", "abc", "context"]);
        assert_eq!(cli.user.as_deref(), Some("abc"));
        assert!(matches!(cli.command, Command::Context));
    }

    #[test]
    fn test_category_conversion_covers_lab_result() {
        let category: RecordCategory = CategoryArg::LabResult.into();
        assert_eq!(category, RecordCategory::LabResult);
    }

    #[test]
    fn test_triage_complete_parses() {
        let cli = Cli::parse_from([
            "carelog",
            "triage",
            "complete",
            "some-id",
            "--diagnosis",
            "Tension headache",
            "--severity",
            "low",
            "--confidence",
            "0.8",
        ]);
        match cli.command {
            Command::Triage(TriageCommand::Complete(args)) => {
                assert_eq!(args.confidence, 0.8);
                assert!(matches!(args.severity, TriageSeverityArg::Low));
            }
            _ => panic!("Expected triage complete"),
        }
    }
}
