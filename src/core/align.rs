//! Alignment of locomotion and resampled concentration onto one timeline.

use crate::core::bouts::SedentarySet;
use crate::core::types::{CombinedRow, ResampledBin, ROWS_PER_FILE_NUMBER};
use crate::input::{LocomotionSample, RunningMeasure};
use serde::{Deserialize, Serialize};

/// The per-second aligned view, one row per locomotion second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    rows: Vec<CombinedRow>,
}

impl Timeline {
    /// Left-join locomotion samples with concentration bins on `second`.
    ///
    /// Every locomotion second is kept; bins past the last locomotion second
    /// are dropped. Rows start unflagged, see [`Timeline::with_sedentary`].
    pub fn align(samples: &[LocomotionSample], bins: &[ResampledBin]) -> Self {
        let rows = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                let bin = bins.get(sample.second);
                CombinedRow {
                    time_label: sample.time_label.clone(),
                    interval_count: sample.interval_count,
                    speed: sample.speed,
                    distance: sample.distance,
                    total_count: sample.total_count,
                    second: sample.second,
                    avg_concentration: bin.and_then(|b| b.avg_concentration),
                    source_label: bin.and_then(|b| b.source_label.clone()),
                    group_index: index / ROWS_PER_FILE_NUMBER + 1,
                    sedentary: false,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            rows = rows.len(),
            with_concentration = rows.iter().filter(|r| r.has_concentration()).count(),
            "Aligned timeline"
        );

        Self { rows }
    }

    /// Return the timeline with the sedentary flag set from `sedentary`.
    pub fn with_sedentary(self, sedentary: &SedentarySet) -> Self {
        let rows = self
            .rows
            .into_iter()
            .map(|row| CombinedRow {
                sedentary: sedentary.contains(row.second),
                ..row
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[CombinedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<CombinedRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for a second. Seconds are dense, so this is a direct index.
    pub fn get(&self, second: usize) -> Option<&CombinedRow> {
        self.rows.get(second)
    }

    /// The chosen locomotion measure for every second, in order.
    pub fn measure_values(&self, measure: RunningMeasure) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.measure(measure))
            .collect()
    }
}
