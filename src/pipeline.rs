//! End-to-end analysis of one recording pair.
//!
//! Each run is a pure function of the two input tables and the configuration:
//! resample, align, segment, label, extract.

use crate::config::{AnalysisConfig, AnalysisParams, BinWindow, ConfigError};
use crate::core::{
    extract_windows, resample, segment, ResampleError, Segmentation, Timeline, WindowTables,
};
use crate::export::{assemble, ExportBundle};
use crate::input::{ConcentrationReading, ConcentrationTable, LocomotionSample, LocomotionTable};
use crate::report::RunSummary;

/// Errors that stop an analysis run.
#[derive(Debug)]
pub enum AnalysisError {
    /// A parameter is outside its valid range
    InvalidConfig(ConfigError),
    /// The concentration table has no readings
    EmptyInput,
    /// A concentration timestamp is too large to bin
    TimestampOutOfRange { timestamp: f64, max: f64 },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::InvalidConfig(e) => write!(f, "Invalid configuration: {e}"),
            AnalysisError::EmptyInput => write!(f, "Concentration table has no readings"),
            AnalysisError::TimestampOutOfRange { timestamp, max } => write!(
                f,
                "Concentration timestamp {timestamp} s is past the {max} s limit"
            ),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::InvalidConfig(e) => Some(e),
            AnalysisError::EmptyInput | AnalysisError::TimestampOutOfRange { .. } => None,
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        AnalysisError::InvalidConfig(e)
    }
}

impl From<ResampleError> for AnalysisError {
    fn from(e: ResampleError) -> Self {
        match e {
            ResampleError::EmptyInput => AnalysisError::EmptyInput,
            ResampleError::TimestampOutOfRange { timestamp, max } => {
                AnalysisError::TimestampOutOfRange { timestamp, max }
            }
        }
    }
}

/// Everything one run derives from its inputs.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Timeline with the sedentary flag applied
    pub timeline: Timeline,
    pub segmentation: Segmentation,
    pub tables: WindowTables,
    pub summary: RunSummary,
}

impl Analysis {
    /// Package the timeline and derived tables for export.
    pub fn bundle(&self) -> ExportBundle {
        assemble(&self.timeline, &self.tables)
    }
}

/// Analyze parsed samples and readings with validated parameters.
pub fn analyze(
    samples: &[LocomotionSample],
    readings: &[ConcentrationReading],
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    if params.bin_window == BinWindow::Narrow {
        tracing::warn!(
            "Using the narrow [s, s + 0.9] bin window; readings late in a second are dropped"
        );
    }

    let bins = resample(readings, params.bin_window)?;
    let aligned = Timeline::align(samples, &bins);
    let segmentation = segment(&aligned, params);
    let timeline = aligned.with_sedentary(&segmentation.sedentary);
    let tables = extract_windows(&timeline, &segmentation, params);

    let summary = RunSummary {
        locomotion_samples: samples.len(),
        concentration_readings: readings.len(),
        bins: bins.len(),
        empty_bins: bins.iter().filter(|b| b.is_empty()).count(),
        aligned_with_concentration: timeline
            .rows()
            .iter()
            .filter(|r| r.has_concentration())
            .count(),
        running_bouts: segmentation.running_bouts.len(),
        sedentary_seconds: segmentation.sedentary.len(),
        during_rows: tables.during.len(),
        before_rows: tables.before.len(),
        offset_rows: tables.offset.len(),
        after_rows: tables.after.len(),
        sedentary_rows: tables.sedentary.len(),
        ..RunSummary::default()
    };

    if summary.no_bouts_found() {
        tracing::info!("No running bouts reached the minimum length");
    }

    Ok(Analysis {
        timeline,
        segmentation,
        tables,
        summary,
    })
}

/// Validate the configuration, then analyze parsed input tables.
///
/// Reader-level recoveries (discarded blocks, skipped rows) are carried into
/// the run summary.
pub fn run_analysis(
    locomotion: &LocomotionTable,
    concentration: &ConcentrationTable,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    let params = config.validate()?;

    let mut analysis = analyze(&locomotion.samples, &concentration.readings, &params)?;
    analysis.summary.discarded_blocks = usize::from(locomotion.truncated.is_some());
    analysis.summary.skipped_concentration_rows = concentration.skipped_rows;

    tracing::info!(
        seconds = analysis.summary.locomotion_samples,
        running_bouts = analysis.summary.running_bouts,
        sedentary_seconds = analysis.summary.sedentary_seconds,
        "Analysis complete"
    );

    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MalformedBlock;

    fn samples(speeds: &[f64]) -> Vec<LocomotionSample> {
        speeds
            .iter()
            .enumerate()
            .map(|(second, &speed)| LocomotionSample::new(second, "00:00:00", speed))
            .collect()
    }

    fn readings(seconds: usize) -> Vec<ConcentrationReading> {
        (0..seconds)
            .map(|s| ConcentrationReading::new(s as f64 + 0.5, s as f64, "rat4.csv"))
            .collect()
    }

    #[test]
    fn test_empty_concentration_is_fatal() {
        let result = analyze(&samples(&[0.0, 1.0]), &[], &AnalysisParams::default());
        assert!(matches!(result, Err(AnalysisError::EmptyInput)));
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let config = AnalysisConfig {
            pre_running_seconds: -1,
            ..AnalysisConfig::default()
        };
        let result = run_analysis(
            &LocomotionTable::default(),
            &ConcentrationTable::default(),
            &config,
        );
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_no_bouts_is_not_an_error() {
        let analysis = analyze(
            &samples(&[0.0; 30]),
            &readings(30),
            &AnalysisParams::default(),
        )
        .unwrap();

        assert!(analysis.summary.no_bouts_found());
        assert!(analysis.tables.during.is_empty());
        assert!(analysis.tables.before.is_empty());
        assert_eq!(analysis.timeline.len(), 30);
    }

    #[test]
    fn test_summary_carries_reader_recoveries() {
        let locomotion = LocomotionTable {
            samples: samples(&[0.0, 3.0, 3.0, 0.0]),
            truncated: Some(MalformedBlock {
                row: 21,
                marker: "10:00:04".to_string(),
                missing: 1,
            }),
        };
        let concentration = ConcentrationTable {
            readings: readings(4),
            skipped_rows: 2,
        };
        let analysis =
            run_analysis(&locomotion, &concentration, &AnalysisConfig::default()).unwrap();

        assert_eq!(analysis.summary.discarded_blocks, 1);
        assert_eq!(analysis.summary.skipped_concentration_rows, 2);
        assert_eq!(analysis.summary.running_bouts, 1);
        assert_eq!(analysis.summary.during_rows, 2);
    }

    #[test]
    fn test_timeline_is_labeled() {
        let mut speeds = vec![0.0; 10];
        speeds[9] = 1.0;
        let params = AnalysisParams {
            sedentary_window_length: 2,
            ..AnalysisParams::default()
        };
        let analysis = analyze(&samples(&speeds), &readings(10), &params).unwrap();

        let flags: Vec<bool> = analysis.timeline.rows().iter().map(|r| r.sedentary).collect();
        // Window around second 6 is [4, 8]; every later window reaches 9
        let mut expected = vec![true; 9];
        expected.push(false);
        assert_eq!(flags, expected);
    }

    #[test]
    fn test_outlier_timestamp_fails_cleanly() {
        let readings = crate::input::parse_concentration(
            "time,concentration\n0.5,1\n1e20,2\n".as_bytes(),
            "rat4.csv",
        )
        .unwrap();
        let result = analyze(&samples(&[0.0]), &readings.readings, &AnalysisParams::default());

        assert!(matches!(
            result,
            Err(AnalysisError::TimestampOutOfRange { .. })
        ));
    }
}
