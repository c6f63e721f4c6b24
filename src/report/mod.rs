//! Reporting for the Dopamine Bout Analyzer.
//!
//! This module tracks what each analysis run consumed and produced.

pub mod summary;

// Re-export commonly used types
pub use summary::RunSummary;
