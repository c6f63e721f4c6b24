//! Dopamine Bout Analyzer - aligns running-wheel locomotion with dopamine
//! voltammetry and extracts bout-anchored concentration windows.
//!
//! A run takes two recordings of the same session: a per-second locomotion
//! table and an irregularly sampled concentration table. It produces six
//! tables sharing one schema: the combined timeline, dopamine during, before,
//! near the end of, and after each running bout, and the sedentary seconds.
//!
//! # Guarantees
//!
//! - **Deterministic**: the same inputs and parameters give byte-identical tables
//! - **No interpolation**: seconds without a reading stay empty
//! - **Inputs untouched**: readers never modify the source files
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Dopamine Bout Analyzer                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │  Resampler  │──▶│   Aligner   │──▶│  Segmenter  │       │
//! │  │ (1 s bins)  │   │ (timeline)  │   │(bouts, sed.)│       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         ▲                                    │              │
//! │         │                                    ▼              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Readers   │   │   Export    │◀──│   Window    │       │
//! │  │   (CSV)     │   │ (+manifest) │   │  Extractor  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use dopamine_bout_analyzer::{config::AnalysisConfig, input, pipeline};
//! use std::path::Path;
//!
//! let locomotion = input::read_locomotion("rat4_locomotion.csv").expect("locomotion");
//! let dopamine = input::read_concentration("rat4.csv").expect("dopamine");
//!
//! let analysis = pipeline::run_analysis(&locomotion, &dopamine, &AnalysisConfig::default())
//!     .expect("analysis");
//! analysis
//!     .bundle()
//!     .write_csv_dir(Path::new("exports"))
//!     .expect("export");
//! println!("{}", analysis.summary);
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod input;
pub mod pipeline;
pub mod report;

// Re-export key types at crate root for convenience
pub use config::{AnalysisConfig, AnalysisParams, BinWindow, Config, ConfigError, ExportFormat};
pub use self::core::{CombinedRow, RunningBout, SedentarySet, Timeline, WindowTables};
pub use export::{assemble, ExportBundle, ExportError, ManifestBuilder, RunManifest};
pub use input::{InputError, RunningMeasure};
pub use pipeline::{analyze, run_analysis, Analysis, AnalysisError};
pub use report::RunSummary;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
