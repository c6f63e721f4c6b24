//! Run manifest written beside the exported tables.
//!
//! The tables themselves carry no run-specific data. Everything that changes
//! from one run to the next (instance id, timestamps) lives here.

use super::tables::ExportBundle;
use super::ExportError;
use crate::config::AnalysisConfig;
use crate::report::RunSummary;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The name of this producer.
pub const PRODUCER_NAME: &str = "dopamine-bout-analyzer";

/// File name of the manifest inside an export directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestProducer {
    /// Name of the producing software
    pub name: String,
    /// Version of the producing software
    pub version: String,
    /// Unique instance identifier (UUID)
    pub instance_id: String,
}

/// One exported table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTable {
    pub name: String,
    /// File holding the table, relative to the export directory
    pub file: String,
    pub rows: usize,
}

/// Input files of the run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locomotion: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<PathBuf>,
}

/// Description of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// When the run finished (RFC3339)
    pub computed_at_utc: String,
    pub producer: ManifestProducer,
    pub inputs: ManifestInputs,
    /// Parameters the run used
    pub analysis: AnalysisConfig,
    pub summary: RunSummary,
    /// Tables in export order
    pub tables: Vec<ManifestTable>,
}

impl RunManifest {
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::SerializeError(e.to_string()))
    }

    /// Write the manifest as `manifest.json` inside `dir`.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir).map_err(|e| ExportError::IoError(e.to_string()))?;
        let path = dir.join(MANIFEST_FILE);
        std::fs::write(&path, self.to_json()?).map_err(|e| ExportError::IoError(e.to_string()))?;
        Ok(path)
    }
}

/// Builder for run manifests.
pub struct ManifestBuilder {
    instance_id: Uuid,
    inputs: ManifestInputs,
}

impl ManifestBuilder {
    /// Create a new builder with a unique instance ID.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            inputs: ManifestInputs::default(),
        }
    }

    /// Record the input files of the run.
    pub fn with_inputs(mut self, locomotion: &Path, concentration: &Path) -> Self {
        self.inputs = ManifestInputs {
            locomotion: Some(locomotion.to_path_buf()),
            concentration: Some(concentration.to_path_buf()),
        };
        self
    }

    /// Get the instance ID.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Describe a finished run.
    ///
    /// `table_file` names the file each table was written to; a JSON export
    /// puts every table in one file.
    pub fn build(
        &self,
        config: &AnalysisConfig,
        summary: &RunSummary,
        bundle: &ExportBundle,
        table_file: impl Fn(&str) -> String,
    ) -> RunManifest {
        let tables = bundle
            .tables
            .iter()
            .map(|table| ManifestTable {
                name: table.name.clone(),
                file: table_file(&table.name),
                rows: table.rows.len(),
            })
            .collect();

        RunManifest {
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: ManifestProducer {
                name: PRODUCER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                instance_id: self.instance_id.to_string(),
            },
            inputs: self.inputs.clone(),
            analysis: config.clone(),
            summary: summary.clone(),
            tables,
        }
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
