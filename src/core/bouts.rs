//! Running-bout and sedentary-neighborhood detection.
//!
//! Both passes read the same per-second locomotion measure but label it in
//! different ways:
//! - running bouts are maximal contiguous runs of positive values, kept when
//!   long enough (list semantics, each bout has a start and a stop)
//! - sedentary seconds are the union of every all-zero window centred on a
//!   zero second (set semantics, membership only)

use crate::config::AnalysisParams;
use crate::core::align::Timeline;
use serde::{Deserialize, Serialize};

/// A maximal run of consecutive running seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBout {
    /// First running second
    pub start: usize,
    /// Last running second (inclusive)
    pub stop: usize,
}

impl RunningBout {
    /// Number of seconds in the bout, never zero.
    pub fn duration(&self) -> usize {
        self.stop - self.start + 1
    }

    pub fn seconds(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.stop
    }
}

/// Scanner state for running-bout detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Accumulating { start: usize },
}

/// Find every running bout of at least `min_length` seconds.
///
/// Bouts are returned in ascending order and never overlap.
pub fn detect_running_bouts(values: &[f64], min_length: usize) -> Vec<RunningBout> {
    let mut bouts = Vec::new();
    let mut state = ScanState::Idle;

    let close = |start: usize, end: usize, bouts: &mut Vec<RunningBout>| {
        if end - start >= min_length {
            bouts.push(RunningBout {
                start,
                stop: end - 1,
            });
        }
    };

    for (i, &value) in values.iter().enumerate() {
        let running = value > 0.0;
        state = match (state, running) {
            (ScanState::Idle, true) => ScanState::Accumulating { start: i },
            (ScanState::Idle, false) => ScanState::Idle,
            (ScanState::Accumulating { start }, true) => ScanState::Accumulating { start },
            (ScanState::Accumulating { start }, false) => {
                close(start, i, &mut bouts);
                ScanState::Idle
            }
        };
    }

    // A bout running into the last second is closed by the end of the data
    if let ScanState::Accumulating { start } = state {
        close(start, values.len(), &mut bouts);
    }

    bouts
}

/// Seconds that sit inside at least one all-zero neighborhood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SedentarySet {
    members: Vec<bool>,
    count: usize,
}

impl SedentarySet {
    pub fn contains(&self, second: usize) -> bool {
        self.members.get(second).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Member seconds in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(second, &member)| member.then_some(second))
    }

    pub fn is_superset(&self, other: &SedentarySet) -> bool {
        other.iter().all(|second| self.contains(second))
    }
}

/// Mark every second covered by an all-zero window of half-width `window`.
///
/// The window around second `i` is `[i - window, i + window]` clipped to the
/// data, and only values exactly equal to zero count as still.
pub fn detect_sedentary(values: &[f64], window: usize) -> SedentarySet {
    let n = values.len();
    let mut members = vec![false; n];

    // moving[k] = number of non-zero values before index k
    let mut moving = Vec::with_capacity(n + 1);
    moving.push(0usize);
    for &value in values {
        let last = moving[moving.len() - 1];
        moving.push(last + usize::from(value != 0.0));
    }

    for (i, &value) in values.iter().enumerate() {
        if value != 0.0 {
            continue;
        }
        let lo = i.saturating_sub(window);
        let hi = i.saturating_add(window).min(n - 1);
        if moving[hi + 1] == moving[lo] {
            members[lo..=hi].iter_mut().for_each(|m| *m = true);
        }
    }

    let count = members.iter().filter(|&&m| m).count();
    SedentarySet { members, count }
}

/// Both labelings of one timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub running_bouts: Vec<RunningBout>,
    pub sedentary: SedentarySet,
}

/// Run both detection passes over the configured running measure.
pub fn segment(timeline: &Timeline, params: &AnalysisParams) -> Segmentation {
    let values = timeline.measure_values(params.running_measure);
    let running_bouts = detect_running_bouts(&values, params.min_running_bout_length);
    let sedentary = detect_sedentary(&values, params.sedentary_window_length);

    tracing::debug!(
        running_bouts = running_bouts.len(),
        longest_bout = running_bouts.iter().map(RunningBout::duration).max().unwrap_or(0),
        sedentary_seconds = sedentary.len(),
        measure = params.running_measure.column_name(),
        "Segmented locomotion"
    );

    Segmentation {
        running_bouts,
        sedentary,
    }
}
