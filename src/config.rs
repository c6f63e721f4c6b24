//! Configuration for the Dopamine Bout Analyzer.

use crate::input::RunningMeasure;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data directories.
const APP_DIR: &str = "dopamine-bout-analyzer";

/// Main configuration for the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bout and window parameters
    pub analysis: AnalysisConfig,

    /// Directory for exported tables
    pub export_path: PathBuf,

    /// Format of exported tables
    pub export_format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            analysis: AnalysisConfig::default(),
            export_path: data_dir.join("exports"),
            export_format: ExportFormat::Csv,
        }
    }
}

impl Config {
    /// Analyzer settings from the user config file, or the built-in defaults
    /// when `dopamine-bouts init` has never been run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Read settings from a JSON file. Keys missing from the file keep their
    /// default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Write settings to the user config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Write settings as pretty JSON to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// `<config dir>/dopamine-bout-analyzer/config.json`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.json")
    }

    /// Create the export directory so a first run can write into it.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.export_path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", self.export_path.display())))
    }
}

/// How exported tables are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// One CSV file per table
    #[default]
    Csv,
    /// A single JSON document holding every table
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ConfigError::ParseError(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

/// Which readings fall into the bin of second `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinWindow {
    /// `s <= t < s + 1`
    #[default]
    HalfOpen,
    /// `s <= t <= s + 0.9`, kept for reproducing older exports
    Narrow,
}

/// Bout and window parameters as supplied by the operator.
///
/// Lengths are signed so that out-of-range values coming from a file or a
/// flag reach [`AnalysisConfig::validate`] instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum consecutive running seconds for a running bout
    pub min_running_bout_length: i64,
    /// Half-width of the all-zero neighborhood for sedentary seconds
    pub sedentary_window_length: i64,
    /// Seconds before bout start in the Before window
    pub pre_running_seconds: i64,
    /// Seconds after bout end in the After window
    pub post_running_seconds: i64,
    /// Seconds before bout end in the Offset window
    pub pre_offset_seconds: i64,
    /// Locomotion column used to classify running
    pub running_measure: RunningMeasure,
    /// Resampling bin convention
    pub bin_window: BinWindow,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_running_bout_length: 2,
            sedentary_window_length: 20,
            pre_running_seconds: 5,
            post_running_seconds: 5,
            pre_offset_seconds: 5,
            running_measure: RunningMeasure::AverageSpeed,
            bin_window: BinWindow::HalfOpen,
        }
    }
}

impl AnalysisConfig {
    /// Check every parameter against its lower bound.
    pub fn validate(&self) -> Result<AnalysisParams, ConfigError> {
        Ok(AnalysisParams {
            min_running_bout_length: at_least(
                "min_running_bout_length",
                self.min_running_bout_length,
                1,
            )?,
            sedentary_window_length: at_least(
                "sedentary_window_length",
                self.sedentary_window_length,
                1,
            )?,
            pre_running_seconds: at_least("pre_running_seconds", self.pre_running_seconds, 0)?,
            post_running_seconds: at_least("post_running_seconds", self.post_running_seconds, 0)?,
            pre_offset_seconds: at_least("pre_offset_seconds", self.pre_offset_seconds, 0)?,
            running_measure: self.running_measure,
            bin_window: self.bin_window,
        })
    }
}

fn at_least(name: &'static str, value: i64, min: i64) -> Result<usize, ConfigError> {
    if value < min {
        return Err(ConfigError::OutOfRange { name, value, min });
    }
    usize::try_from(value).map_err(|_| ConfigError::OutOfRange { name, value, min })
}

/// Validated parameters consumed by the pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    pub min_running_bout_length: usize,
    pub sedentary_window_length: usize,
    pub pre_running_seconds: usize,
    pub post_running_seconds: usize,
    pub pre_offset_seconds: usize,
    pub running_measure: RunningMeasure,
    pub bin_window: BinWindow,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_running_bout_length: 2,
            sedentary_window_length: 20,
            pre_running_seconds: 5,
            post_running_seconds: 5,
            pre_offset_seconds: 5,
            running_measure: RunningMeasure::AverageSpeed,
            bin_window: BinWindow::HalfOpen,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::OutOfRange { name, value, min } => {
                write!(f, "Invalid {name}: {value} (must be at least {min})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
