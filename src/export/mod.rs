//! Export of analysis results.
//!
//! This module contains:
//! - Assembly of the six named output tables
//! - CSV and JSON writers for those tables
//! - The run manifest written beside them

pub mod manifest;
pub mod tables;

// Re-export commonly used types
pub use manifest::{ManifestBuilder, RunManifest, MANIFEST_FILE, PRODUCER_NAME};
pub use tables::{assemble, ExportBundle, NamedTable, TABLE_NAMES};

/// Export errors.
#[derive(Debug)]
pub enum ExportError {
    IoError(String),
    CsvError(String),
    SerializeError(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::IoError(e) => write!(f, "IO error: {e}"),
            ExportError::CsvError(e) => write!(f, "CSV error: {e}"),
            ExportError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for ExportError {}
