//! Core extractor implementation

use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::engine::{LopdfEngine, PdfEngine};

/// Converts a document payload into plain text, never failing past its
/// own boundary
pub struct TextExtractor {
    engine: Box<dyn PdfEngine + Send + Sync>,
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Create an extractor with a specific engine
    pub fn new(engine: Box<dyn PdfEngine + Send + Sync>, config: ExtractorConfig) -> Self {
        Self { engine, config }
    }

    /// Create an extractor with the production `lopdf` engine
    pub fn with_default_engine(config: ExtractorConfig) -> Self {
        Self::new(Box::new(LopdfEngine), config)
    }

    /// Extract plain text from a document payload
    ///
    /// The filename decides whether extraction is attempted at all:
    /// only the recognized `.pdf` suffix (case-insensitive) is parsed.
    /// Per page: trim surrounding whitespace and skip pages that yield no
    /// text; non-empty pages are joined with a blank line. The result is
    /// hard-capped at `max_text_chars` characters, no ellipsis marker.
    ///
    /// Any parse failure returns an empty string; the caller stores the
    /// document regardless.
    pub fn extract(&self, bytes: &[u8], filename: &str) -> String {
        if !is_recognized_format(filename) {
            debug!(filename, "Unrecognized format, skipping extraction");
            return String::new();
        }

        let pages = match self.engine.extract_pages(bytes) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(filename, "Text extraction failed: {}", e);
                return String::new();
            }
        };

        let parts: Vec<&str> = pages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();

        truncate_chars(parts.join("\n\n"), self.config.max_text_chars)
    }
}

/// Whether the filename carries the recognized container format suffix
pub fn is_recognized_format(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
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
    use crate::engine::MockPdfEngine;

    fn extractor_with_pages(pages: Vec<&str>) -> TextExtractor {
        TextExtractor::new(
            Box::new(MockPdfEngine::with_pages(
                pages.into_iter().map(String::from).collect(),
            )),
            ExtractorConfig::default(),
        )
    }

    #[test]
    fn test_unrecognized_suffix_skips_extraction() {
        // Engine would fail, but it must never be consulted for a .docx
        let extractor =
            TextExtractor::new(Box::new(MockPdfEngine::failing()), ExtractorConfig::default());
        assert_eq!(extractor.extract(b"whatever", "notes.docx"), "");
        assert_eq!(extractor.extract(b"whatever", "noextension"), "");
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        let extractor = extractor_with_pages(vec!["Page text"]);
        assert_eq!(extractor.extract(b"x", "REPORT.PDF"), "Page text");
        assert_eq!(extractor.extract(b"x", "report.Pdf"), "Page text");
    }

    #[test]
    fn test_pages_joined_with_blank_line() {
        let extractor = extractor_with_pages(vec!["  first page ", "second page\n"]);
        assert_eq!(
            extractor.extract(b"x", "a.pdf"),
            "first page\n\nsecond page"
        );
    }

    #[test]
    fn test_empty_pages_skipped() {
        let extractor = extractor_with_pages(vec!["one", "   ", "", "two"]);
        assert_eq!(extractor.extract(b"x", "a.pdf"), "one\n\ntwo");
    }

    #[test]
    fn test_parse_failure_yields_empty_string() {
        let extractor =
            TextExtractor::new(Box::new(MockPdfEngine::failing()), ExtractorConfig::default());
        assert_eq!(extractor.extract(b"corrupt", "a.pdf"), "");
    }

    #[test]
    fn test_corrupt_payload_with_real_engine_yields_empty_string() {
        let extractor = TextExtractor::with_default_engine(ExtractorConfig::default());
        assert_eq!(extractor.extract(b"not a real pdf", "scan.pdf"), "");
    }

    #[test]
    fn test_output_capped_at_max_chars() {
        let long_page = "a".repeat(60_000);
        let extractor = extractor_with_pages(vec![&long_page]);
        let text = extractor.extract(b"x", "big.pdf");
        assert_eq!(text.chars().count(), 50_000);
    }

    #[test]
    fn test_cap_counts_characters_not_bytes() {
        // Multibyte characters: the cap must land on a char boundary
        let page = "é".repeat(60_000);
        let extractor = TextExtractor::new(
            Box::new(MockPdfEngine::with_pages(vec![page])),
            ExtractorConfig::default(),
        );
        let text = extractor.extract(b"x", "accents.pdf");
        assert_eq!(text.chars().count(), 50_000);
    }

    #[test]
    fn test_no_pages_yields_empty_string() {
        let extractor = extractor_with_pages(vec![]);
        assert_eq!(extractor.extract(b"x", "empty.pdf"), "");
    }
}
