//! Error types for the fallible edges of the calculator (files, CSV, JSON)
//!
//! The discounting engine and the horizon resizer never fail; only loading
//! parameters and reading or writing exports can.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed export at line {line}: {reason}")]
    MalformedExport { line: usize, reason: String },

    #[error("Malformed input in {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },
}

/// Result alias for calculator operations that touch the outside world.
pub type Result<T> = std::result::Result<T, ClvError>;
