#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Grouped and descriptive statistics over a cleaned dataset.
pub mod aggregate;
/// Chart-set rendering (presentation collaborator).
pub mod charts;
/// Row-level cleaning and enrichment.
pub mod cleaner;
/// Pipeline configuration types.
pub mod config;
/// Centralized schema, sentinel, and artifact constants.
pub mod constants;
/// Source decoding and delimited-table parsing.
pub mod loader;
/// Record, raw-row, and dataset types.
pub mod record;
/// Text report writers (presentation collaborator).
pub mod report;
/// End-to-end pipeline orchestration.
pub mod runner;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregate::{analyze, AnalysisResult};
pub use cleaner::{clean, CleaningSummary};
pub use config::{CleanerConfig, DatePolicy, LoaderConfig, PipelineConfig, ReportConfig};
pub use errors::AnalysisError;
pub use loader::load_raw;
pub use record::{Dataset, RawRecord, RawTable, Record};
pub use runner::{run, ArtifactOutcome, RunSummary};
pub use types::{ColumnName, CountryName, CustomerName, OrderNumber, ProductCode};
