use std::path::PathBuf;
use thiserror::Error;

/// The main error type for penguinview operations.
///
/// Only the I/O edges (dataset files, user-supplied URLs, CLI arguments)
/// produce errors. Query-string decoding, filtering and aggregation are
/// total and never fail.
#[derive(Debug, Error)]
pub enum PenguinviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset JSON from {path}: {source}")]
    DatasetJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write records JSON to {path}: {source}")]
    DatasetJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse dataset CSV from {path}: {source}")]
    DatasetCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid URL '{input}': {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}
