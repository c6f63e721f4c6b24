//! Bout-anchored window extraction.
//!
//! Every running bout contributes up to four windows of timeline rows:
//!
//! | Window | Seconds                        | Measure |
//! |--------|--------------------------------|---------|
//! | Before | `[start - pre, start)`         | `== 0`  |
//! | During | `[start, stop]`                | `> 0`   |
//! | Offset | `[stop - pre_offset, stop)`    | `> 0`   |
//! | After  | `(stop, stop + post]`          | `== 0`  |
//!
//! Only rows with a concentration value are kept. Ranges are clipped to the
//! timeline, so a bout at either end of the recording simply contributes
//! fewer rows.

use crate::config::AnalysisParams;
use crate::core::align::Timeline;
use crate::core::bouts::{RunningBout, Segmentation, SedentarySet};
use crate::core::types::CombinedRow;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The four windows taken around each running bout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutWindow {
    Before,
    During,
    Offset,
    After,
}

impl BoutWindow {
    pub const ALL: [BoutWindow; 4] = [
        BoutWindow::Before,
        BoutWindow::During,
        BoutWindow::Offset,
        BoutWindow::After,
    ];

    /// Seconds covered by this window for `bout`, clipped to `len` rows.
    pub fn range(&self, bout: &RunningBout, params: &AnalysisParams, len: usize) -> Range<usize> {
        let range = match self {
            BoutWindow::Before => bout.start.saturating_sub(params.pre_running_seconds)..bout.start,
            BoutWindow::During => bout.start..bout.stop + 1,
            BoutWindow::Offset => bout.stop.saturating_sub(params.pre_offset_seconds)..bout.stop,
            BoutWindow::After => {
                bout.stop + 1..bout.stop.saturating_add(params.post_running_seconds) + 1
            }
        };
        range.start.min(len)..range.end.min(len)
    }

    /// Whether a locomotion value satisfies this window's motion filter.
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            BoutWindow::Before | BoutWindow::After => value == 0.0,
            BoutWindow::During | BoutWindow::Offset => value > 0.0,
        }
    }
}

/// Rows collected for every window across all bouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowTables {
    pub during: Vec<CombinedRow>,
    pub before: Vec<CombinedRow>,
    pub offset: Vec<CombinedRow>,
    pub after: Vec<CombinedRow>,
    pub sedentary: Vec<CombinedRow>,
}

impl WindowTables {
    pub fn rows(&self, window: BoutWindow) -> &[CombinedRow] {
        match window {
            BoutWindow::Before => &self.before,
            BoutWindow::During => &self.during,
            BoutWindow::Offset => &self.offset,
            BoutWindow::After => &self.after,
        }
    }

    fn rows_mut(&mut self, window: BoutWindow) -> &mut Vec<CombinedRow> {
        match window {
            BoutWindow::Before => &mut self.before,
            BoutWindow::During => &mut self.during,
            BoutWindow::Offset => &mut self.offset,
            BoutWindow::After => &mut self.after,
        }
    }
}

/// Rows of one window for one bout, in ascending second order.
pub fn window_rows<'a>(
    timeline: &'a Timeline,
    bout: &RunningBout,
    window: BoutWindow,
    params: &AnalysisParams,
) -> impl Iterator<Item = &'a CombinedRow> + 'a {
    let measure = params.running_measure;
    let range = window.range(bout, params, timeline.len());
    timeline.rows()[range]
        .iter()
        .filter(move |row| row.has_concentration() && window.accepts(row.measure(measure)))
}

/// Sedentary seconds that have a concentration value, ascending.
pub fn sedentary_rows(timeline: &Timeline, sedentary: &SedentarySet) -> Vec<CombinedRow> {
    sedentary
        .iter()
        .filter_map(|second| timeline.get(second))
        .filter(|row| row.has_concentration())
        .cloned()
        .collect()
}

/// Extract all window tables from a labeled timeline.
pub fn extract_windows(
    timeline: &Timeline,
    segmentation: &Segmentation,
    params: &AnalysisParams,
) -> WindowTables {
    let mut tables = WindowTables::default();

    for bout in &segmentation.running_bouts {
        for window in BoutWindow::ALL {
            let rows = window_rows(timeline, bout, window, params).cloned();
            tables.rows_mut(window).extend(rows);
        }
    }

    tables.sedentary = sedentary_rows(timeline, &segmentation.sedentary);

    tracing::debug!(
        during = tables.during.len(),
        before = tables.before.len(),
        offset = tables.offset.len(),
        after = tables.after.len(),
        sedentary = tables.sedentary.len(),
        "Extracted bout windows"
    );

    tables
}
