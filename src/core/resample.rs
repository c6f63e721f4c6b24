//! Per-second resampling of concentration readings.
//!
//! Readings arrive at irregular timestamps. They are collected into one bin
//! per whole second from 0 to the floor of the latest timestamp, and each bin
//! reports the mean of its readings or nothing when it is empty.

use crate::config::BinWindow;
use crate::core::types::ResampledBin;
use crate::input::ConcentrationReading;

/// Upper edge of the narrow bin, relative to the bin start.
const NARROW_BIN_WIDTH: f64 = 0.9;

/// Latest accepted timestamp in seconds (one week of recording).
///
/// One bin is allocated per second up to the latest timestamp, so an outlier
/// far past any real session is rejected instead of sized into bins.
pub const MAX_TIMESTAMP_SECONDS: f64 = 7.0 * 24.0 * 3600.0;

/// Errors raised while resampling.
#[derive(Debug, Clone, PartialEq)]
pub enum ResampleError {
    /// No readings, so there is no latest timestamp to size the bins from
    EmptyInput,
    /// A reading lies past [`MAX_TIMESTAMP_SECONDS`]
    TimestampOutOfRange { timestamp: f64, max: f64 },
}

impl std::fmt::Display for ResampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResampleError::EmptyInput => write!(f, "Concentration table has no readings"),
            ResampleError::TimestampOutOfRange { timestamp, max } => {
                write!(f, "Timestamp {timestamp} s is past the {max} s limit")
            }
        }
    }
}

impl std::error::Error for ResampleError {}

impl BinWindow {
    /// Whether a timestamp belongs to the bin starting at `second`.
    pub fn contains(&self, second: usize, timestamp: f64) -> bool {
        let start = second as f64;
        match self {
            BinWindow::HalfOpen => timestamp >= start && timestamp < start + 1.0,
            BinWindow::Narrow => timestamp >= start && timestamp <= start + NARROW_BIN_WIDTH,
        }
    }
}

/// Running sum for one bin.
#[derive(Default)]
struct BinAccumulator<'a> {
    sum: f64,
    count: usize,
    first_label: Option<&'a str>,
}

/// Resample readings into one bin per second.
///
/// Readings with a negative or non-finite timestamp belong to no bin. A
/// timestamp past [`MAX_TIMESTAMP_SECONDS`] fails the whole run.
pub fn resample(
    readings: &[ConcentrationReading],
    window: BinWindow,
) -> Result<Vec<ResampledBin>, ResampleError> {
    if readings.is_empty() {
        return Err(ResampleError::EmptyInput);
    }

    let max_timestamp = readings
        .iter()
        .map(|r| r.timestamp)
        .filter(|t| t.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if max_timestamp > MAX_TIMESTAMP_SECONDS {
        return Err(ResampleError::TimestampOutOfRange {
            timestamp: max_timestamp,
            max: MAX_TIMESTAMP_SECONDS,
        });
    }

    let bin_count = if max_timestamp >= 0.0 {
        max_timestamp.floor() as usize + 1
    } else {
        0
    };

    let mut accumulators: Vec<BinAccumulator> =
        (0..bin_count).map(|_| BinAccumulator::default()).collect();

    for reading in readings {
        let t = reading.timestamp;
        if !t.is_finite() || t < 0.0 {
            continue;
        }

        let second = t.floor() as usize;
        if !window.contains(second, t) {
            continue;
        }

        if let Some(acc) = accumulators.get_mut(second) {
            acc.sum += reading.concentration;
            acc.count += 1;
            if acc.first_label.is_none() {
                acc.first_label = Some(reading.source_label.as_str());
            }
        }
    }

    let bins: Vec<ResampledBin> = accumulators
        .into_iter()
        .enumerate()
        .map(|(second, acc)| ResampledBin {
            second,
            avg_concentration: (acc.count > 0).then(|| acc.sum / acc.count as f64),
            source_label: acc.first_label.map(str::to_string),
        })
        .collect();

    tracing::debug!(
        bins = bins.len(),
        empty = bins.iter().filter(|b| b.is_empty()).count(),
        ?window,
        "Resampled concentration readings"
    );

    Ok(bins)
}
