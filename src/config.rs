use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Source file location plus the ordered encoding candidates to attempt.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Path to the delimited source table.
    pub source_path: PathBuf,
    /// Encodings tried in order; the first that decodes cleanly wins.
    ///
    /// `encoding_rs` folds the latin1 / cp1252 / iso-8859-1 labels into
    /// WINDOWS_1252, so the upstream three-way fallback collapses to one
    /// candidate here; UTF-8 is tried first so clean exports stay exact.
    pub encoding_candidates: Vec<&'static Encoding>,
}

impl LoaderConfig {
    /// Build a loader config for `path` with the default candidate list.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("sales_data_sample.csv"),
            encoding_candidates: vec![UTF_8, WINDOWS_1252],
        }
    }
}

/// Policy applied when a record's order date fails to parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// Abort the whole load; dates drive every temporal aggregate.
    #[default]
    Fatal,
    /// Drop the offending record and log a warning.
    Drop,
}

/// Cleaning-stage configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct CleanerConfig {
    /// How unparseable order dates are handled.
    pub date_policy: DatePolicy,
}

/// Where report and chart artifacts are written.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    /// Directory receiving every output artifact.
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Clone, Debug, Default)]
pub struct PipelineConfig {
    /// Loader stage settings.
    pub loader: LoaderConfig,
    /// Cleaner stage settings.
    pub cleaner: CleanerConfig,
    /// Artifact output settings.
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Build a pipeline config reading from `path` with default policies,
    /// writing artifacts next to the current working directory.
    pub fn for_source<P: AsRef<Path>>(path: P) -> Self {
        Self {
            loader: LoaderConfig::for_path(path),
            ..Self::default()
        }
    }
}
