//! Core analysis for the Dopamine Bout Analyzer.
//!
//! This module contains:
//! - Resampling of concentration readings into one-second bins
//! - Alignment of locomotion and concentration into one timeline
//! - Running-bout and sedentary detection
//! - Extraction of bout-anchored windows

pub mod align;
pub mod bouts;
pub mod resample;
pub mod types;
pub mod windows;

// Re-export commonly used types
pub use align::Timeline;
pub use bouts::{
    detect_running_bouts, detect_sedentary, segment, RunningBout, Segmentation, SedentarySet,
};
pub use resample::{resample, ResampleError};
pub use types::{CombinedRow, ResampledBin, COLUMNS, ROWS_PER_FILE_NUMBER};
pub use windows::{extract_windows, sedentary_rows, window_rows, BoutWindow, WindowTables};
