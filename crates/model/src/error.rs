use std::path::PathBuf;
use thiserror::Error;

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or validating datasets
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed CSV content
    #[error("CSV error in {path}: {source}")]
    CsvError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed JSON content
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Required dataset file is absent
    #[error("Missing dataset file: {0}")]
    MissingFile(PathBuf),

    /// Stance other than 1 or -1
    #[error("Invalid stance {0} (expected 1 or -1)")]
    InvalidStance(i64),

    /// Same id appears twice in one file
    #[error("Duplicate {kind} id '{id}' in {path}")]
    DuplicateId {
        kind: &'static str,
        id: String,
        path: PathBuf,
    },

    /// Label row references an argument or key point that does not exist
    #[error("Label on line {line} of {path} references unknown {kind} '{id}'")]
    UnknownReference {
        kind: &'static str,
        id: String,
        line: usize,
        path: PathBuf,
    },

    /// Label outside of [0, 1]
    #[error("Label {label} on line {line} of {path} is outside [0, 1]")]
    LabelOutOfRange {
        label: f64,
        line: usize,
        path: PathBuf,
    },
}

impl DataError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::CsvError {
            path: path.into(),
            source,
        }
    }
}
