//! Reader for running-wheel exports.
//!
//! The wheel software writes one block per second: a `HH:MM:SS` marker in the
//! first column, followed by four rows whose second column holds the interval
//! count, average speed, distance and total count for that second.

use crate::input::types::LocomotionSample;
use crate::input::InputError;
use chrono::NaiveTime;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Number of value rows following each time marker.
const BLOCK_VALUE_ROWS: usize = 4;

/// Format of the per-second marker cell.
const MARKER_FORMAT: &str = "%H:%M:%S";

/// A trailing block that ended before all of its value rows were present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedBlock {
    /// 1-based row of the time marker
    pub row: usize,
    /// The marker text
    pub marker: String,
    /// How many of the value rows were missing
    pub missing: usize,
}

impl std::fmt::Display for MalformedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "block at row {} ({}) is missing {} of {} value rows",
            self.row, self.marker, self.missing, BLOCK_VALUE_ROWS
        )
    }
}

/// Parsed locomotion data.
#[derive(Debug, Clone, Default)]
pub struct LocomotionTable {
    pub samples: Vec<LocomotionSample>,
    /// Set when the file ended in the middle of a block
    pub truncated: Option<MalformedBlock>,
}

impl LocomotionTable {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Read a running-wheel export from a CSV file.
pub fn read_locomotion(path: impl AsRef<Path>) -> Result<LocomotionTable, InputError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| InputError::IoError(format!("{}: {e}", path.display())))?;
    parse_locomotion(file)
}

/// Parse a running-wheel export from any reader.
pub fn parse_locomotion<R: Read>(reader: R) -> Result<LocomotionTable, InputError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let records: Vec<StringRecord> = csv_reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| InputError::CsvError(e.to_string()))?;

    let mut table = LocomotionTable::default();

    for (i, record) in records.iter().enumerate() {
        let marker = record.get(0).unwrap_or("").trim();
        if NaiveTime::parse_from_str(marker, MARKER_FORMAT).is_err() {
            continue;
        }

        let available = records.len().saturating_sub(i + 1).min(BLOCK_VALUE_ROWS);
        if available < BLOCK_VALUE_ROWS {
            let block = MalformedBlock {
                row: i + 1,
                marker: marker.to_string(),
                missing: BLOCK_VALUE_ROWS - available,
            };
            tracing::warn!("Discarding incomplete locomotion block: {}", block);
            table.truncated = Some(block);
            break;
        }

        let value = |offset: usize, column: &str| {
            value_cell(&records[i + offset], i + offset, column)
        };

        table.samples.push(LocomotionSample {
            second: table.samples.len(),
            time_label: marker.to_string(),
            interval_count: value(1, "Interval Count")?,
            speed: value(2, "Average m/min")?,
            distance: value(3, "Distance")?,
            total_count: value(4, "Total Counts")?,
        });
    }

    tracing::debug!(
        samples = table.samples.len(),
        truncated = table.truncated.is_some(),
        "Parsed locomotion table"
    );

    Ok(table)
}

/// Read the numeric value in the second column of a block row.
fn value_cell(record: &StringRecord, index: usize, column: &str) -> Result<f64, InputError> {
    let raw = record.get(1).unwrap_or("").trim();
    raw.parse::<f64>().map_err(|_| InputError::InvalidNumber {
        row: index + 1,
        column: column.to_string(),
        value: raw.to_string(),
    })
}
