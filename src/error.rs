//! Error types for document ingestion
//!
//! Errors are classified by how the caller should degrade:
//! - Missing: the source document is absent, serve an empty record
//! - Corrupt: the container could not be opened, skip it or substitute a placeholder

use std::path::PathBuf;
use thiserror::Error;

/// Error types for opening and parsing source documents
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Source document not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook could not be read: {0}")]
    Workbook(String),

    #[error("Document could not be converted: {0}")]
    Document(String),

    #[error("Unsupported format: .{0}")]
    UnsupportedFormat(String),
}

impl IngestError {
    /// Returns true if the source document simply does not exist
    pub fn is_missing(&self) -> bool {
        match self {
            IngestError::NotFound(_) => true,
            IngestError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Errors raised while loading `config.json`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_classification() {
        assert!(IngestError::NotFound(PathBuf::from("a.xlsx")).is_missing());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(IngestError::from(io).is_missing());
        assert!(!IngestError::Workbook("bad zip".into()).is_missing());
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(!IngestError::from(denied).is_missing());
    }
}
