//! Named output tables and their writers.
//!
//! Table contents depend only on the inputs and parameters, so repeated runs
//! produce byte-identical files. Run-specific metadata goes to the manifest.

use super::ExportError;
use crate::core::{CombinedRow, Timeline, WindowTables, COLUMNS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const COMBINED_DATA: &str = "Combined Data";
pub const DOPAMINE_DURING: &str = "Dopamine During";
pub const DOPAMINE_BEFORE: &str = "Dopamine Before";
pub const DOPAMINE_OFFSET: &str = "Dopamine Offset";
pub const DOPAMINE_AFTER: &str = "Dopamine After";
pub const SEDENTARY_BOUTS: &str = "Sedentary Bouts";

/// Table names in export order.
pub const TABLE_NAMES: [&str; 6] = [
    COMBINED_DATA,
    DOPAMINE_DURING,
    DOPAMINE_BEFORE,
    DOPAMINE_OFFSET,
    DOPAMINE_AFTER,
    SEDENTARY_BOUTS,
];

/// One named table with the full timeline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTable {
    pub name: String,
    pub rows: Vec<CombinedRow>,
}

impl NamedTable {
    pub fn new(name: &str, rows: Vec<CombinedRow>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }

    /// File name used when the table is written on its own.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name.to_lowercase().replace(' ', "_"))
    }

    /// Write the table as CSV with a header row, even when empty.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer
            .write_record(COLUMNS)
            .map_err(|e| ExportError::CsvError(e.to_string()))?;
        for row in &self.rows {
            csv_writer
                .serialize(row)
                .map_err(|e| ExportError::CsvError(e.to_string()))?;
        }
        csv_writer
            .flush()
            .map_err(|e| ExportError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// The full set of output tables for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub tables: Vec<NamedTable>,
}

/// Package the timeline and the derived tables in export order.
pub fn assemble(timeline: &Timeline, tables: &WindowTables) -> ExportBundle {
    ExportBundle {
        tables: vec![
            NamedTable::new(COMBINED_DATA, timeline.rows().to_vec()),
            NamedTable::new(DOPAMINE_DURING, tables.during.clone()),
            NamedTable::new(DOPAMINE_BEFORE, tables.before.clone()),
            NamedTable::new(DOPAMINE_OFFSET, tables.offset.clone()),
            NamedTable::new(DOPAMINE_AFTER, tables.after.clone()),
            NamedTable::new(SEDENTARY_BOUTS, tables.sedentary.clone()),
        ],
    }
}

impl ExportBundle {
    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&NamedTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Write every table as its own CSV file under `dir`.
    ///
    /// Returns the written paths in export order.
    pub fn write_csv_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir).map_err(|e| ExportError::IoError(e.to_string()))?;

        let mut written = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let path = dir.join(table.file_name());
            let file =
                std::fs::File::create(&path).map_err(|e| ExportError::IoError(e.to_string()))?;
            table.write_csv(std::io::BufWriter::new(file))?;
            tracing::debug!(table = %table.name, rows = table.rows.len(), path = ?path, "Wrote table");
            written.push(path);
        }
        Ok(written)
    }

    /// Serialize every table into one JSON document.
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::SerializeError(e.to_string()))
    }

    /// Write the JSON document to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::IoError(e.to_string()))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| ExportError::IoError(e.to_string()))
    }
}
