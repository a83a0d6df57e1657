//! Error handling for farm record loading and export.
//!
//! Only source-level problems are errors here. Per-row data quality issues
//! (unparsable payloads, and bad dates under the lenient policy) are absorbed
//! by the loader and never reach the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("The '{column}' column is not present in the source (found: {available})")]
    Schema { column: String, available: String },

    #[error("Invalid date in data row {row}: '{value}' (expected day-first, e.g. 05/03/2024)")]
    DateParse { row: usize, value: String },

    #[error("Export failed for {path}: {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, FarmError>;
