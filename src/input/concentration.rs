//! Reader for voltammetry concentration exports.

use crate::input::types::ConcentrationReading;
use crate::input::InputError;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Accepted headers for the timestamp column, compared case-insensitively.
const TIME_COLUMNS: [&str; 2] = ["time (seconds)", "time"];

/// Header of the concentration column, compared case-insensitively.
const CONCENTRATION_COLUMN: &str = "concentration";

/// Parsed concentration data.
#[derive(Debug, Clone, Default)]
pub struct ConcentrationTable {
    pub readings: Vec<ConcentrationReading>,
    /// Rows dropped because a timestamp or concentration cell was blank
    pub skipped_rows: usize,
}

/// Read a concentration export from a CSV file.
///
/// The file's base name becomes the source label of every reading.
pub fn read_concentration(path: impl AsRef<Path>) -> Result<ConcentrationTable, InputError> {
    let path = path.as_ref();
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = std::fs::File::open(path)
        .map_err(|e| InputError::IoError(format!("{}: {e}", path.display())))?;
    parse_concentration(file, &label)
}

/// Parse a concentration export from any reader.
pub fn parse_concentration<R: Read>(
    reader: R,
    source_label: &str,
) -> Result<ConcentrationTable, InputError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| InputError::CsvError(e.to_string()))?
        .clone();

    let time_idx = find_column(&headers, &TIME_COLUMNS).ok_or_else(|| {
        InputError::MissingColumn {
            column: "Time (seconds)".to_string(),
        }
    })?;
    let conc_idx = find_column(&headers, &[CONCENTRATION_COLUMN]).ok_or_else(|| {
        InputError::MissingColumn {
            column: "Concentration".to_string(),
        }
    })?;

    let mut table = ConcentrationTable::default();

    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| InputError::CsvError(e.to_string()))?;
        // Header is row 1
        let row = row_idx + 2;

        let time_raw = record.get(time_idx).unwrap_or("");
        let conc_raw = record.get(conc_idx).unwrap_or("");
        if time_raw.is_empty() || conc_raw.is_empty() {
            table.skipped_rows += 1;
            continue;
        }

        let timestamp = parse_number(time_raw, row, &headers[time_idx])?;
        let concentration = parse_number(conc_raw, row, &headers[conc_idx])?;

        table.readings.push(ConcentrationReading {
            timestamp,
            concentration,
            source_label: source_label.to_string(),
        });
    }

    if table.skipped_rows > 0 {
        tracing::warn!(
            skipped = table.skipped_rows,
            "Skipped concentration rows with blank cells"
        );
    }
    tracing::debug!(readings = table.readings.len(), "Parsed concentration table");

    Ok(table)
}

/// Locate the first header matching any of the candidates.
fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(candidate))
    })
}

fn parse_number(raw: &str, row: usize, column: &str) -> Result<f64, InputError> {
    raw.parse::<f64>().map_err(|_| InputError::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_headers() {
        let data = " Time (seconds) , Concentration \n0.2,10\n0.5,12\n1.1,20\n";
        let table = parse_concentration(data.as_bytes(), "rat4.csv").unwrap();

        assert_eq!(table.readings.len(), 3);
        assert_eq!(table.readings[0], ConcentrationReading::new(0.2, 10.0, "rat4.csv"));
        assert_eq!(table.readings[2].timestamp, 1.1);
        assert_eq!(table.skipped_rows, 0);
    }

    #[test]
    fn test_alternate_time_header() {
        let data = "time,concentration,quality\n3.25,41.5,ok\n";
        let table = parse_concentration(data.as_bytes(), "session").unwrap();

        assert_eq!(table.readings.len(), 1);
        assert_eq!(table.readings[0].timestamp, 3.25);
        assert_eq!(table.readings[0].concentration, 41.5);
    }

    #[test]
    fn test_missing_concentration_column() {
        let data = "time,signal\n1,2\n";
        match parse_concentration(data.as_bytes(), "x") {
            Err(InputError::MissingColumn { column }) => assert_eq!(column, "Concentration"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let data = "time,concentration\n0.1,5\n,\n0.4,\n0.8,7\n";
        let table = parse_concentration(data.as_bytes(), "x").unwrap();

        assert_eq!(table.readings.len(), 2);
        assert_eq!(table.skipped_rows, 2);
    }

    #[test]
    fn test_invalid_number_reports_row() {
        let data = "time,concentration\n0.1,5\n0.2,n/a\n";
        match parse_concentration(data.as_bytes(), "x") {
            Err(InputError::InvalidNumber { row, value, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }
}
