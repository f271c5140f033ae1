use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Crate error type
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading, splitting, scoring or
/// rendering a dataset.
///
/// Value errors carry the offending values together with the valid
/// range/set so the message alone is enough to fix the call.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more fold numbers fall outside `[1, n_folds]`.
    #[error("invalid folds {invalid:?}: folds must be between 1 and {n_folds}")]
    InvalidFolds { invalid: Vec<i64>, n_folds: usize },

    #[error("n_folds must be a positive integer, got {0}")]
    InvalidFoldCount(usize),

    /// Requested target names that are not `_target` columns of the table.
    #[error("invalid targets {invalid:?}. Valid targets: {}", .valid.join(", "))]
    InvalidTargets {
        invalid: Vec<String>,
        valid: Vec<String>,
    },

    #[error("{what}: expected {expected} values but got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {actual} cells but the table has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),

    /// Unknown dataset name or missing backing file.
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset container is missing the '{0}' component")]
    MissingComponent(&'static str),

    #[error("malformed dataset container: {0}")]
    Malformed(String),

    #[error("model predict() called before fit()")]
    NotFitted,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    /// True for "missing resource" errors as opposed to bad arguments.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True for errors caused by an argument outside its valid range/set.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidFolds { .. }
                | Error::InvalidFoldCount(_)
                | Error::InvalidTargets { .. }
                | Error::LengthMismatch { .. }
                | Error::RaggedRow { .. }
                | Error::MalformedCoordinates(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                what: format!("dataset file {}", path.display()),
            }
        } else {
            Error::Io { path, source }
        }
    }

    pub(crate) fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_message_names_value_and_range() {
        let e = Error::InvalidFolds {
            invalid: vec![11],
            n_folds: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("11"));
        assert!(msg.contains("between 1 and 10"));
        assert!(e.is_invalid_argument());
        assert!(!e.is_not_found());
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e = Error::io("data/BB_250.json", io);
        assert!(e.is_not_found());
        assert!(e.to_string().contains("BB_250.json"));
    }
}
