use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading, cleaning, and artifact-writing failures.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No candidate encoding decoded the source bytes cleanly.
    #[error("unable to decode '{path}' with any candidate encoding ({attempted})")]
    UnreadableSource {
        /// Source file that failed to decode.
        path: PathBuf,
        /// Names of the encodings attempted, in order.
        attempted: String,
    },
    /// A required column header is absent from the source table.
    #[error("required column '{column}' is missing from the source table")]
    Schema {
        /// The missing column header.
        column: String,
    },
    /// An order date failed to parse under the fatal date policy.
    #[error("row {row}: unparseable order date '{value}'")]
    DateParse {
        /// 1-based data row number of the offending record.
        row: usize,
        /// The raw date text that failed to parse.
        value: String,
    },
    /// Malformed delimited data reported by the parser.
    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),
    /// Chart backend failure while rendering an image artifact.
    #[error("chart rendering failed: {0}")]
    Chart(String),
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
