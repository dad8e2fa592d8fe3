use std::path::PathBuf;

use thiserror::Error;

/// Lookups that fail because something the caller named does not exist.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Input file {0:?} not found")]
    InputNotFound(PathBuf),
    #[error("Data directory {0:?} not found")]
    DataDirNotFound(PathBuf),
    #[error("Column '{column}' not found. Available: {available:?}")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    #[error("Missing '{0}' parameter")]
    MissingParameter(&'static str),
}
