//! Per-run statistics.
//!
//! Counts what went into a run and what came out of it, so an operator can
//! check an export at a glance without opening the tables.

use serde::{Deserialize, Serialize};

/// Counts collected while running one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Locomotion seconds parsed
    pub locomotion_samples: usize,
    /// Trailing locomotion blocks discarded as incomplete
    pub discarded_blocks: usize,
    /// Concentration readings parsed
    pub concentration_readings: usize,
    /// Concentration rows skipped for blank cells
    pub skipped_concentration_rows: usize,
    /// One-second concentration bins
    pub bins: usize,
    /// Bins without any reading
    pub empty_bins: usize,
    /// Timeline seconds with a concentration value
    pub aligned_with_concentration: usize,
    /// Running bouts found
    pub running_bouts: usize,
    /// Seconds in the sedentary set
    pub sedentary_seconds: usize,
    /// Rows in each derived table
    pub during_rows: usize,
    pub before_rows: usize,
    pub offset_rows: usize,
    pub after_rows: usize,
    pub sedentary_rows: usize,
}

impl RunSummary {
    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "Run Statistics:\n\
             - Locomotion seconds: {}\n\
             - Discarded locomotion blocks: {}\n\
             - Concentration readings: {} ({} rows skipped)\n\
             - Concentration bins: {} ({} empty)\n\
             - Seconds with concentration: {}\n\
             \n\
             Bouts:\n\
             - Running bouts: {}\n\
             - Sedentary seconds: {}\n\
             \n\
             Exported rows:\n\
             - During: {}\n\
             - Before: {}\n\
             - Offset: {}\n\
             - After: {}\n\
             - Sedentary: {}",
            self.locomotion_samples,
            self.discarded_blocks,
            self.concentration_readings,
            self.skipped_concentration_rows,
            self.bins,
            self.empty_bins,
            self.aligned_with_concentration,
            self.running_bouts,
            self.sedentary_seconds,
            self.during_rows,
            self.before_rows,
            self.offset_rows,
            self.after_rows,
            self.sedentary_rows
        )
    }

    /// Whether no running bout qualified, leaving the bout tables empty.
    pub fn no_bouts_found(&self) -> bool {
        self.running_bouts == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}
