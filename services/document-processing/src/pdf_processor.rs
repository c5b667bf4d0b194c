//! PDF Processor
//!
//! Extracts text from PDF documents and keeps the pages that look like
//! certificates of analysis.

use coacheck_utils::{CoaError, CoaResult};
use tracing::{debug, info};

/// Phrases typical of a COA page.
const COA_INDICATORS: &[&str] = &[
    "CERTIFICATE OF ANALYSIS",
    "Test Name",
    "Test Method",
    "Unit",
    "Value",
    "Specification",
    "Batch",
    "Material:",
    "Reference No:",
];

/// Indicators a page needs before it counts as a COA page.
const MIN_INDICATORS: usize = 3;

/// PDF processing result
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub pages: Vec<PageContent>,
}

/// Single page content
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
    pub is_coa: bool,
}

impl PdfContent {
    /// Split extracted text into pages on form feeds.
    pub fn from_text(text: &str) -> Self {
        let pages = text
            .split('\u{c}')
            .enumerate()
            .map(|(idx, page)| PageContent {
                page_number: idx + 1,
                text: page.to_string(),
                is_coa: is_coa_page(page),
            })
            .collect();

        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of the COA pages, or of every page when none qualifies.
    pub fn coa_text(&self) -> String {
        let selected: Vec<&str> = self
            .pages
            .iter()
            .filter(|page| page.is_coa)
            .map(|page| page.text.as_str())
            .collect();

        if selected.is_empty() {
            debug!(pages = self.pages.len(), "no page looks like a COA, using all text");
            return self.pages.iter().map(|page| page.text.as_str()).collect::<Vec<_>>().join("\n");
        }

        info!(coa_pages = selected.len(), pages = self.pages.len(), "selected COA pages");
        selected.join("\n")
    }
}

/// Whether `text` carries enough COA indicators.
pub fn is_coa_page(text: &str) -> bool {
    COA_INDICATORS
        .iter()
        .filter(|indicator| text.contains(*indicator))
        .count()
        >= MIN_INDICATORS
}

/// PDF processor
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract content from PDF bytes
    pub fn extract(&self, data: &[u8]) -> CoaResult<PdfContent> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| CoaError::pdf_extraction(e.to_string()))?;

        let content = PdfContent::from_text(&text);
        debug!(pages = content.page_count(), "extracted PDF text");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coa_page_detection() {
        assert!(is_coa_page("CERTIFICATE OF ANALYSIS\nBatch\nTest Name  Value"));
        assert!(!is_coa_page("Delivery note\nBatch 241226D257"));
        assert!(!is_coa_page(""));
    }

    #[test]
    fn test_only_coa_pages_are_kept() {
        let text = "Delivery note\nBatch 241226D257\u{c}Material: X\nTest Name  Test Method  Value\nML100  N200.5700  53  47 - 59";
        let content = PdfContent::from_text(text);

        assert_eq!(content.page_count(), 2);
        assert!(!content.pages[0].is_coa);
        assert!(content.pages[1].is_coa);
        assert!(content.coa_text().starts_with("Material: X"));
    }

    #[test]
    fn test_all_pages_used_without_coa_page() {
        let content = PdfContent::from_text("first\u{c}second");
        assert_eq!(content.coa_text(), "first\nsecond");
    }

    #[test]
    fn test_invalid_pdf_is_an_extraction_error() {
        let err = PdfProcessor::new().extract(b"not a pdf").unwrap_err();
        assert_eq!(err.error_code(), "PDF_EXTRACTION_ERROR");
    }
}
