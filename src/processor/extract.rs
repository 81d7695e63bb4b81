//! Plain-text extraction from the document formats found in the synced tree.
//!
//! Word documents go through the markup converter, PDFs through
//! `pdf-extract`, and text-like files are read directly.

use std::path::Path;

use crate::error::IngestError;
use crate::processor::markup;

/// Supported document formats, detected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    /// .docx
    Docx,
    /// .pdf
    Pdf,
    /// .txt, .md, .csv, .tsv, .json, .log
    PlainText,
    Unsupported,
}

/// Detect the document format from file extension.
pub fn detect_format(path: &Path) -> SupportedFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "docx" => SupportedFormat::Docx,
        "pdf" => SupportedFormat::Pdf,
        "txt" | "md" | "csv" | "tsv" | "json" | "log" => SupportedFormat::PlainText,
        _ => SupportedFormat::Unsupported,
    }
}

/// Extract text content from a file.
pub fn to_plain_text(path: &Path) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }

    match detect_format(path) {
        SupportedFormat::Docx => markup::to_plain_text(path),
        SupportedFormat::Pdf => extract_pdf(path),
        SupportedFormat::PlainText => extract_plaintext(path),
        SupportedFormat::Unsupported => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string();
            Err(IngestError::UnsupportedFormat(ext))
        }
    }
}

fn extract_plaintext(path: &Path) -> Result<String, IngestError> {
    // Try UTF-8, fall back to lossy conversion
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(_) => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

fn extract_pdf(path: &Path) -> Result<String, IngestError> {
    // pdf-extract can panic on malformed PDFs
    let path_buf = path.to_path_buf();
    let result = std::panic::catch_unwind(move || pdf_extract::extract_text(&path_buf));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(IngestError::Document(format!("PDF: {}", e))),
        Err(_) => Err(IngestError::Document(
            "PDF extraction panicked (malformed file)".to_string(),
        )),
    }
}
