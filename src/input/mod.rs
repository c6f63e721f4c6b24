//! Table readers for the two recordings.
//!
//! Spreadsheet exports are expected to be saved as CSV first. The readers
//! only normalize layout; all analysis happens in [`crate::core`].

pub mod concentration;
pub mod locomotion;
pub mod types;

// Re-export commonly used types
pub use concentration::{parse_concentration, read_concentration, ConcentrationTable};
pub use locomotion::{parse_locomotion, read_locomotion, LocomotionTable, MalformedBlock};
pub use types::{ConcentrationReading, LocomotionSample, RunningMeasure};

/// Errors raised while reading input tables.
#[derive(Debug)]
pub enum InputError {
    IoError(String),
    CsvError(String),
    MissingColumn {
        column: String,
    },
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::IoError(e) => write!(f, "IO error: {e}"),
            InputError::CsvError(e) => write!(f, "CSV error: {e}"),
            InputError::MissingColumn { column } => write!(f, "Missing column: {column}"),
            InputError::InvalidNumber { row, column, value } => {
                write!(f, "Row {row}: '{value}' in {column} is not a number")
            }
        }
    }
}

impl std::error::Error for InputError {}
