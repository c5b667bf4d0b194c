//! Input loading: PDF or plain-text files into one COA text buffer.

use coacheck_utils::{CoaError, CoaResult};
use std::path::Path;
use tracing::info;

use crate::pdf_processor::PdfProcessor;

/// Extensions picked up by directory batch runs.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Whether a batch run should pick up `path`.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Turn uploaded or read bytes into text. `name` decides PDF vs text.
pub fn text_from_bytes(name: &str, data: &[u8]) -> CoaResult<String> {
    let text = if is_pdf_name(name) {
        info!(file = %name, "processing PDF file");
        PdfProcessor::new().extract(data)?.coa_text()
    } else {
        String::from_utf8(data.to_vec())
            .map_err(|e| CoaError::io(name, format!("not valid UTF-8: {e}")))?
    };

    if text.trim().is_empty() {
        return Err(CoaError::empty_input(name));
    }
    Ok(text)
}

/// Read a COA file from disk.
pub fn read_input_file(path: &Path) -> CoaResult<String> {
    let display = path.display().to_string();
    let data = std::fs::read(path).map_err(|e| CoaError::io(&display, e.to_string()))?;
    text_from_bytes(&display, &data)
}
