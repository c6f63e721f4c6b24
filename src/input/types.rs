//! Parsed input records for the analyzer.
//!
//! Both record types are produced once by the readers and never mutated.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// One second of running-wheel output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotionSample {
    /// Re-indexed second (0..N-1 in file order)
    pub second: usize,
    /// The `HH:MM:SS` marker this block was read from
    pub time_label: String,
    /// Wheel interval count
    pub interval_count: f64,
    /// Average speed in m/min
    pub speed: f64,
    /// Distance covered
    pub distance: f64,
    /// Cumulative wheel count
    pub total_count: f64,
}

impl LocomotionSample {
    pub fn new(second: usize, time_label: impl Into<String>, speed: f64) -> Self {
        Self {
            second,
            time_label: time_label.into(),
            interval_count: 0.0,
            speed,
            distance: 0.0,
            total_count: 0.0,
        }
    }
}

/// A single voltammetry reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationReading {
    /// Seconds since recording start, not integer aligned
    pub timestamp: f64,
    pub concentration: f64,
    /// Base name of the file the reading came from
    pub source_label: String,
}

impl ConcentrationReading {
    pub fn new(timestamp: f64, concentration: f64, source_label: impl Into<String>) -> Self {
        Self {
            timestamp,
            concentration,
            source_label: source_label.into(),
        }
    }
}

/// Which locomotion column decides running vs. sedentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunningMeasure {
    IntervalCount,
    #[default]
    AverageSpeed,
    Distance,
}

impl RunningMeasure {
    /// Column header of the measure in exported tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            RunningMeasure::IntervalCount => "Interval Count",
            RunningMeasure::AverageSpeed => "Average m/min",
            RunningMeasure::Distance => "Distance",
        }
    }
}

impl std::str::FromStr for RunningMeasure {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "interval_count" => Ok(RunningMeasure::IntervalCount),
            "average_speed" => Ok(RunningMeasure::AverageSpeed),
            "distance" => Ok(RunningMeasure::Distance),
            other => Err(ConfigError::ParseError(format!(
                "unknown running measure '{other}'"
            ))),
        }
    }
}
