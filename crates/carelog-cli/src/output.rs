//! Output formatting for command results

use colored::Colorize;
use tabled::{Table, Tabled};

use carelog_domain::{Document, Record, TriageResult, TriageSession};

use crate::config::OutputFormat;

/// Renders command results in the configured format
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Create a formatter; disabling color applies process-wide
    pub fn new(format: OutputFormat, color: bool) -> Self {
        if !color {
            colored::control::set_override(false);
        }
        Self { format }
    }

    /// Print a list of records
    pub fn print_records(&self, records: &[Record]) {
        match self.format {
            OutputFormat::Table => {
                if records.is_empty() {
                    println!("No records");
                    return;
                }
                let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
                println!("{}", Table::new(rows));
            }
            OutputFormat::Json => print_json(records),
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.id);
                }
            }
        }
    }

    /// Print one record with its attributes
    pub fn print_record(&self, record: &Record) {
        match self.format {
            OutputFormat::Table => {
                println!("{}", Table::new([RecordRow::from(record)]));
                if !record.description.is_empty() {
                    println!("{} {}", "Description:".bold(), record.description);
                }
                for (key, value) in &record.attributes {
                    println!("  {}: {}", key.cyan(), scalar(value));
                }
            }
            OutputFormat::Json => print_json(record),
            OutputFormat::Quiet => println!("{}", record.id),
        }
    }

    /// Print a list of documents
    pub fn print_documents(&self, documents: &[Document]) {
        match self.format {
            OutputFormat::Table => {
                if documents.is_empty() {
                    println!("No documents");
                    return;
                }
                let rows: Vec<DocumentRow> = documents.iter().map(DocumentRow::from).collect();
                println!("{}", Table::new(rows));
            }
            OutputFormat::Json => print_json(documents),
            OutputFormat::Quiet => {
                for document in documents {
                    println!("{}", document.id);
                }
            }
        }
    }

    /// Print one document, including its extracted text
    pub fn print_document(&self, document: &Document) {
        match self.format {
            OutputFormat::Table => {
                println!("{}", Table::new([DocumentRow::from(document)]));
                if document.extracted_text.is_empty() {
                    println!("{}", "No extracted text".dimmed());
                } else {
                    println!("{}", "Extracted text:".bold());
                    println!("{}", document.extracted_text);
                }
            }
            OutputFormat::Json => print_json(document),
            OutputFormat::Quiet => println!("{}", document.id),
        }
    }

    /// Print a list of triage sessions
    pub fn print_sessions(&self, sessions: &[TriageSession]) {
        match self.format {
            OutputFormat::Table => {
                if sessions.is_empty() {
                    println!("No sessions");
                    return;
                }
                let rows: Vec<SessionRow> = sessions.iter().map(SessionRow::from).collect();
                println!("{}", Table::new(rows));
            }
            OutputFormat::Json => print_json(sessions),
            OutputFormat::Quiet => {
                for session in sessions {
                    println!("{}", session.id);
                }
            }
        }
    }

    /// Print one session and, when present, its result
    pub fn print_session_detail(&self, session: &TriageSession, result: Option<&TriageResult>) {
        match self.format {
            OutputFormat::Table => {
                println!("{}", Table::new([SessionRow::from(session)]));
                match result {
                    Some(result) => {
                        println!("{} {}", "Diagnosis:".bold(), result.diagnosis);
                        println!(
                            "{} {} ({}% confidence)",
                            "Severity:".bold(),
                            severity_colored(result),
                            (result.confidence_score * 100.0).round()
                        );
                        if let Some(items) = result.recommendations.as_array() {
                            for item in items {
                                println!("  - {}", scalar(item));
                            }
                        }
                    }
                    None => println!("{}", "No result yet".dimmed()),
                }
            }
            OutputFormat::Json => print_json(&(session, result)),
            OutputFormat::Quiet => println!("{}", session.id),
        }
    }

    /// Print a confirmation message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Quiet => {}
            _ => println!("{}", message.green()),
        }
    }
}

fn print_json<T: serde::Serialize>(value: T) {
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn severity_colored(result: &TriageResult) -> String {
    use carelog_domain::TriageSeverity;
    let label = result.severity.as_str();
    match result.severity {
        TriageSeverity::Low => label.green().to_string(),
        TriageSeverity::Medium => label.yellow().to_string(),
        TriageSeverity::High | TriageSeverity::Critical => label.red().to_string(),
    }
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Severity")]
    severity: String,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.to_string(),
            category: record.category.label(),
            title: record.title.clone(),
            date: record
                .date_recorded
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: record.status.as_str(),
            severity: record
                .severity
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Filename")]
    filename: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Size")]
    size: u64,
    #[tabled(rename = "Record")]
    record: String,
}

impl From<&Document> for DocumentRow {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.to_string(),
            filename: document.original_filename.clone(),
            category: document.category.label(),
            size: document.file_size,
            record: document
                .record
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Symptoms")]
    symptoms: String,
}

impl From<&TriageSession> for SessionRow {
    fn from(session: &TriageSession) -> Self {
        Self {
            id: session.id.to_string(),
            source: session.source.as_str(),
            status: session.status.as_str(),
            symptoms: session.symptoms_text.clone(),
        }
    }
}
