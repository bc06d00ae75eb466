//! Aggregation engine for k-mer sketch benchmark results.
//!
//! Result files written by the benchmark harness are parsed for their
//! structure variant and K parameter, grouped per K, smoothed, scored
//! against ground truth and assembled into report models that the viewer
//! (or the `bench-report` JSON export) renders.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::ReportConfig;
pub use error::ReportError;
