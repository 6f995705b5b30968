//! PDF parsing engines
//!
//! The engine seam keeps the extractor testable without real PDF payloads:
//! production uses [`LopdfEngine`], tests use [`MockPdfEngine`].

use crate::error::ExtractError;

/// Parses a binary payload into per-page text
pub trait PdfEngine {
    /// Extract the raw text of every page, in page order
    ///
    /// Returned page strings are untrimmed; empty pages are allowed.
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// Production engine backed by `lopdf`
pub struct LopdfEngine;

impl PdfEngine for LopdfEngine {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let document = lopdf::Document::load_mem(bytes)?;

        let mut pages = Vec::new();
        for (page_number, _object_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_number])
                .map_err(|e| ExtractError::UnreadablePage(page_number, e.to_string()))?;
            pages.push(text);
        }

        Ok(pages)
    }
}

/// Test double returning canned pages or a forced failure
pub struct MockPdfEngine {
    pages: Vec<String>,
    fail: bool,
}

impl MockPdfEngine {
    /// Engine that yields the given pages for any payload
    pub fn with_pages(pages: Vec<String>) -> Self {
        Self { pages, fail: false }
    }

    /// Engine that fails every parse
    pub fn failing() -> Self {
        Self {
            pages: Vec::new(),
            fail: true,
        }
    }
}

impl PdfEngine for MockPdfEngine {
    fn extract_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        if self.fail {
            return Err(ExtractError::CorruptPayload("mock failure".to_string()));
        }
        Ok(self.pages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lopdf_engine_rejects_garbage() {
        let result = LopdfEngine.extract_pages(b"definitely not a pdf");
        assert!(result.is_err());
    }

    #[test]
    fn test_mock_engine_pages() {
        let engine = MockPdfEngine::with_pages(vec!["one".to_string(), "two".to_string()]);
        let pages = engine.extract_pages(b"ignored").unwrap();
        assert_eq!(pages, vec!["one", "two"]);
    }

    #[test]
    fn test_mock_engine_failure() {
        let engine = MockPdfEngine::failing();
        assert!(engine.extract_pages(b"ignored").is_err());
    }
}
