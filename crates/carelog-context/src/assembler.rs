//! Bounded context-block assembly from records and documents

use std::cmp::Ordering;

use carelog_domain::{Document, Record, RecordCategory};
use chrono::NaiveDate;

use crate::config::ContextConfig;

/// Assembles one bounded text block from a patient's active records and
/// documents
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    config: ContextConfig,
}

impl ContextAssembler {
    /// Create an assembler with the given caps
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Assemble the context block
    ///
    /// Records are sorted by category (fixed enumeration order, stable)
    /// then occurrence date descending with absent dates last, then
    /// rendered via [`assemble_presorted`](Self::assemble_presorted).
    /// Documents are taken in the order given, which the store contract
    /// guarantees is most recent first.
    pub fn assemble(&self, records: &[Record], documents: &[Document]) -> String {
        let mut ordered: Vec<&Record> = records.iter().collect();
        ordered.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| date_descending(a.date_recorded, b.date_recorded))
        });

        self.assemble_presorted(&ordered, documents)
    }

    /// Assemble from records in caller-supplied order
    ///
    /// Category headings are emitted once per contiguous run of a changed
    /// category. The grouping is driven purely by the given order, not by
    /// a group-by pass: if the order interleaves categories, duplicate
    /// headings are reproduced rather than deduplicated.
    ///
    /// Returns an empty string when the record slice is empty, regardless
    /// of document content: documents alone never trigger assembly.
    pub fn assemble_presorted(&self, records: &[&Record], documents: &[Document]) -> String {
        if records.is_empty() {
            return String::new();
        }

        let mut sections: Vec<String> = Vec::new();
        let mut current_category: Option<RecordCategory> = None;

        for record in records {
            if current_category != Some(record.category) {
                current_category = Some(record.category);
                sections.push(format!("\n## {}", record.category.label()));
            }

            let mut line = format!("- {}", record.title);
            line.push_str(&format!(" (Status: {})", record.status.as_str()));
            if let Some(severity) = record.severity {
                line.push_str(&format!(" [Severity: {}]", severity.as_str()));
            }
            if let Some(date) = record.date_recorded {
                line.push_str(&format!(" — {}", date));
            }
            sections.push(line);

            if !record.description.is_empty() {
                sections.push(format!(
                    "  Details: {}",
                    truncate_chars(record.description.clone(), self.config.description_chars)
                ));
            }

            for (key, value) in &record.attributes {
                sections.push(format!("  {}: {}", key, scalar_to_string(value)));
            }
        }

        let included: Vec<&Document> = documents
            .iter()
            .filter(|d| !d.extracted_text.is_empty())
            .take(self.config.max_documents)
            .collect();

        if !included.is_empty() {
            sections.push("\n## Uploaded Medical Documents".to_string());
            for document in included {
                sections.push(format!(
                    "\n### {} ({})",
                    document.original_filename,
                    document.category.label()
                ));
                sections.push(truncate_chars(
                    document.extracted_text.clone(),
                    self.config.document_text_chars,
                ));
            }
        }

        // The overall cap is the last step and is not line-aware.
        truncate_chars(sections.join("\n"), self.config.max_context_chars)
    }
}

/// Descending date order with absent dates sorting after present ones
fn date_descending(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Render an attribute value without JSON string quoting
fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Truncate at a character boundary, counting characters rather than bytes
fn truncate_chars(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelog_domain::{
        Document, DocumentCategory, Record, RecordCategory, RecordStatus, Severity, UserId,
    };
    use serde_json::json;

    fn owner() -> UserId {
        UserId::from_value(1)
    }

    fn record(category: RecordCategory, title: &str) -> Record {
        Record::new(owner(), category, title, 1000)
    }

    fn document(filename: &str, text: &str) -> Document {
        Document::new(
            owner(),
            DocumentCategory::LabReport,
            filename,
            text.len() as u64,
            text,
            1000,
        )
    }

    fn assembler() -> ContextAssembler {
        ContextAssembler::new(ContextConfig::default())
    }

    #[test]
    fn test_empty_records_short_circuit() {
        // Deliberate source behavior, preserved: documents alone never
        // trigger assembly, even when informative documents exist.
        let docs = vec![document("cbc.pdf", "Hemoglobin 13.5 g/dL")];
        assert_eq!(assembler().assemble(&[], &docs), "");
    }

    #[test]
    fn test_deterministic_output() {
        let mut rec = record(RecordCategory::Condition, "Hypertension");
        rec.description = "Diagnosed during routine exam".to_string();
        rec.severity = Some(Severity::Moderate);
        let records = vec![rec, record(RecordCategory::Medication, "Lisinopril")];
        let docs = vec![document("notes.pdf", "blood pressure log")];

        let first = assembler().assemble(&records, &docs);
        let second = assembler().assemble(&records, &docs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_summary_line() {
        let mut rec = record(RecordCategory::Condition, "Hypertension");
        rec.status = RecordStatus::Chronic;
        rec.severity = Some(Severity::Moderate);
        rec.date_recorded = NaiveDate::from_ymd_opt(2023, 6, 14);

        let output = assembler().assemble(&[rec], &[]);
        assert!(output.contains(
            "- Hypertension (Status: CHRONIC) [Severity: MODERATE] — 2023-06-14"
        ));
        assert!(output.starts_with("\n## Condition / Diagnosis"));
    }

    #[test]
    fn test_summary_line_omits_absent_fields() {
        let rec = record(RecordCategory::Allergy, "Penicillin");
        let output = assembler().assemble(&[rec], &[]);

        assert!(output.contains("- Penicillin (Status: ACTIVE)"));
        assert!(!output.contains("Severity"));
        assert!(!output.contains("—"));
    }

    #[test]
    fn test_description_truncated_to_cap() {
        let mut rec = record(RecordCategory::Condition, "Migraine");
        rec.description = "d".repeat(800);

        let output = assembler().assemble(&[rec], &[]);
        let details_line = output
            .lines()
            .find(|l| l.starts_with("  Details: "))
            .unwrap();
        assert_eq!(
            details_line.len(),
            "  Details: ".len() + 500,
            "Description must appear truncated to exactly 500 characters"
        );
    }

    #[test]
    fn test_empty_description_emits_no_details_line() {
        let rec = record(RecordCategory::Vital, "Blood pressure");
        let output = assembler().assemble(&[rec], &[]);
        assert!(!output.contains("Details:"));
    }

    #[test]
    fn test_attributes_in_insertion_order_without_truncation() {
        let mut rec = record(RecordCategory::Medication, "Metformin");
        rec.attributes = vec![
            ("dosage".to_string(), json!("500mg")),
            ("frequency".to_string(), json!("twice daily")),
            ("refills".to_string(), json!(3)),
        ];

        let output = assembler().assemble(&[rec], &[]);
        let dosage = output.find("  dosage: 500mg").unwrap();
        let frequency = output.find("  frequency: twice daily").unwrap();
        let refills = output.find("  refills: 3").unwrap();
        assert!(dosage < frequency && frequency < refills);
    }

    #[test]
    fn test_records_grouped_by_category_in_enum_order() {
        let records = vec![
            record(RecordCategory::Allergy, "Penicillin"),
            record(RecordCategory::Condition, "Hypertension"),
            record(RecordCategory::Medication, "Lisinopril"),
        ];

        let output = assembler().assemble(&records, &[]);
        let condition = output.find("## Condition / Diagnosis").unwrap();
        let medication = output.find("## Medication").unwrap();
        let allergy = output.find("## Allergy").unwrap();
        assert!(condition < medication && medication < allergy);
    }

    #[test]
    fn test_dates_descending_with_absent_dates_last() {
        let mut older = record(RecordCategory::LabResult, "HbA1c 2022");
        older.date_recorded = NaiveDate::from_ymd_opt(2022, 1, 10);
        let mut newer = record(RecordCategory::LabResult, "HbA1c 2024");
        newer.date_recorded = NaiveDate::from_ymd_opt(2024, 3, 5);
        let undated = record(RecordCategory::LabResult, "HbA1c undated");

        let output = assembler().assemble(&[undated, older, newer], &[]);
        let newer_pos = output.find("HbA1c 2024").unwrap();
        let older_pos = output.find("HbA1c 2022").unwrap();
        let undated_pos = output.find("HbA1c undated").unwrap();
        assert!(newer_pos < older_pos && older_pos < undated_pos);
    }

    #[test]
    fn test_duplicate_headings_reproduced_for_interleaved_categories() {
        // Grouping is driven by the supplied order, not a group-by pass:
        // interleaved categories reproduce the heading rather than
        // deduplicating it.
        let a = record(RecordCategory::Medication, "A");
        let b = record(RecordCategory::Allergy, "B");
        let c = record(RecordCategory::Medication, "C");
        let ordered = [&a, &b, &c];

        let output = assembler().assemble_presorted(&ordered, &[]);
        let first_med = output.find("## Medication").unwrap();
        let a_pos = output.find("- A").unwrap();
        let allergy = output.find("## Allergy").unwrap();
        let b_pos = output.find("- B").unwrap();
        let second_med = output.rfind("## Medication").unwrap();
        let c_pos = output.find("- C").unwrap();

        assert!(first_med < a_pos);
        assert!(allergy < b_pos);
        assert!(second_med > allergy, "Second MEDICATION heading must be reproduced");
        assert!(second_med < c_pos);
        assert_eq!(output.matches("## Medication").count(), 2);
    }

    #[test]
    fn test_document_section_and_truncation() {
        let records = vec![record(RecordCategory::Condition, "Anemia")];
        let long_text = "z".repeat(5_000);
        let docs = vec![document("cbc.pdf", &long_text)];

        let output = assembler().assemble(&records, &docs);
        assert!(output.contains("\n## Uploaded Medical Documents"));
        assert!(output.contains("\n### cbc.pdf (Lab Report)"));

        let included = output.matches('z').count();
        assert_eq!(included, 2_000, "Document text must be capped at 2,000 characters");
    }

    #[test]
    fn test_document_cap_keeps_first_five() {
        let records = vec![record(RecordCategory::Condition, "Anemia")];
        let docs: Vec<Document> = (0..7)
            .map(|i| document(&format!("doc{}.pdf", i), "text"))
            .collect();

        let output = assembler().assemble(&records, &docs);
        for i in 0..5 {
            assert!(output.contains(&format!("doc{}.pdf", i)));
        }
        assert!(!output.contains("doc5.pdf"));
        assert!(!output.contains("doc6.pdf"));
    }

    #[test]
    fn test_documents_with_empty_text_skipped_before_cap() {
        let records = vec![record(RecordCategory::Condition, "Anemia")];
        let mut docs = vec![document("empty0.pdf", ""), document("empty1.pdf", "")];
        docs.extend((0..5).map(|i| document(&format!("full{}.pdf", i), "text")));

        let output = assembler().assemble(&records, &docs);
        assert!(!output.contains("empty0.pdf"));
        // All five non-empty documents make the cut
        for i in 0..5 {
            assert!(output.contains(&format!("full{}.pdf", i)));
        }
    }

    #[test]
    fn test_no_document_section_without_extractable_text() {
        let records = vec![record(RecordCategory::Condition, "Anemia")];
        let docs = vec![document("scan.pdf", "")];

        let output = assembler().assemble(&records, &docs);
        assert!(!output.contains("Uploaded Medical Documents"));
    }

    #[test]
    fn test_overall_cap_applied_last() {
        let records: Vec<Record> = (0..40)
            .map(|i| {
                let mut rec = record(RecordCategory::Condition, &format!("Condition {}", i));
                rec.description = "d".repeat(490);
                rec
            })
            .collect();

        let output = assembler().assemble(&records, &[]);
        assert_eq!(output.chars().count(), 10_000);
    }

    #[test]
    fn test_overall_cap_counts_characters_not_bytes() {
        let mut rec = record(RecordCategory::Condition, "Unicode");
        rec.description = "é".repeat(400);
        let records: Vec<Record> = (0..40).map(|_| rec.clone()).collect();

        let output = assembler().assemble(&records, &[]);
        assert!(output.chars().count() <= 10_000);
        // Still a valid string: truncation landed on a char boundary
        assert!(output.is_char_boundary(output.len()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use carelog_domain::{Document, DocumentCategory, Record, RecordCategory, UserId};
    use proptest::prelude::*;

    fn category_strategy() -> impl Strategy<Value = RecordCategory> {
        prop::sample::select(&RecordCategory::ALL[..])
    }

    fn record_strategy() -> impl Strategy<Value = Record> {
        (
            category_strategy(),
            ".{0,40}",
            ".{0,800}",
            prop::option::of((2000i32..2030, 1u32..13, 1u32..29)),
        )
            .prop_map(|(category, title, description, date)| {
                let mut record = Record::new(UserId::from_value(1), category, title, 1000);
                record.description = description;
                record.date_recorded =
                    date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
                record
            })
    }

    fn document_strategy() -> impl Strategy<Value = Document> {
        ".{0,3000}".prop_map(|text| {
            Document::new(
                UserId::from_value(1),
                DocumentCategory::Other,
                "doc.pdf",
                0,
                text,
                1000,
            )
        })
    }

    proptest! {
        /// Property: the assembled block never exceeds the hard cap
        #[test]
        fn test_hard_cap_invariant(
            records in prop::collection::vec(record_strategy(), 0..30),
            documents in prop::collection::vec(document_strategy(), 0..8),
        ) {
            let output = ContextAssembler::default().assemble(&records, &documents);
            prop_assert!(output.chars().count() <= 10_000);
        }

        /// Property: assembly is deterministic for a fixed snapshot
        #[test]
        fn test_determinism(
            records in prop::collection::vec(record_strategy(), 0..15),
            documents in prop::collection::vec(document_strategy(), 0..4),
        ) {
            let assembler = ContextAssembler::default();
            prop_assert_eq!(
                assembler.assemble(&records, &documents),
                assembler.assemble(&records, &documents)
            );
        }

        /// Property: empty record sets always produce an empty block
        #[test]
        fn test_empty_records_always_empty(
            documents in prop::collection::vec(document_strategy(), 0..8),
        ) {
            let output = ContextAssembler::default().assemble(&[], &documents);
            prop_assert_eq!(output, "");
        }
    }
}
