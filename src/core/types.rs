//! Per-second records shared by the analysis stages.

use crate::input::RunningMeasure;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rows per exported file number.
pub const ROWS_PER_FILE_NUMBER: usize = 60;

/// Column headers of every exported table, in order.
pub const COLUMNS: [&str; 10] = [
    "Time",
    "Interval Count",
    "Average m/min",
    "Distance",
    "Total Counts",
    "Time (seconds)",
    "Avg Dopamine Concentration",
    "File Name",
    "File Number",
    "Sedentary Bout",
];

/// Concentration averaged over one second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledBin {
    pub second: usize,
    /// Mean of the readings in the bin, `None` if the bin is empty
    pub avg_concentration: Option<f64>,
    /// Label of the first reading in the bin
    pub source_label: Option<String>,
}

impl ResampledBin {
    pub fn is_empty(&self) -> bool {
        self.avg_concentration.is_none()
    }
}

/// One second of the aligned timeline.
///
/// Field order and serialized names match [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    #[serde(rename = "Time")]
    pub time_label: String,
    #[serde(rename = "Interval Count")]
    pub interval_count: f64,
    #[serde(rename = "Average m/min")]
    pub speed: f64,
    #[serde(rename = "Distance")]
    pub distance: f64,
    #[serde(rename = "Total Counts")]
    pub total_count: f64,
    #[serde(rename = "Time (seconds)")]
    pub second: usize,
    #[serde(rename = "Avg Dopamine Concentration")]
    pub avg_concentration: Option<f64>,
    #[serde(rename = "File Name")]
    pub source_label: Option<String>,
    #[serde(rename = "File Number")]
    pub group_index: usize,
    #[serde(rename = "Sedentary Bout", with = "yes_no")]
    pub sedentary: bool,
}

impl CombinedRow {
    pub fn has_concentration(&self) -> bool {
        self.avg_concentration.is_some()
    }

    /// Value of the given locomotion measure for this second.
    pub fn measure(&self, measure: RunningMeasure) -> f64 {
        match measure {
            RunningMeasure::IntervalCount => self.interval_count,
            RunningMeasure::AverageSpeed => self.speed,
            RunningMeasure::Distance => self.distance,
        }
    }
}

/// `Yes`/`No` encoding of the sedentary flag.
mod yes_no {
    use super::*;

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "Yes" => Ok(true),
            "No" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected Yes or No, found '{other}'"
            ))),
        }
    }
}
