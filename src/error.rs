use crate::spreadsheet::SpreadsheetError;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type.
/// Aggregates the conversion taxonomy with errors from the standard library
/// and dependencies. None of these are retried anywhere: batch conversion
/// isolates and counts per-file failures, single-resource conversion surfaces
/// the error to the caller.
#[derive(Error, Debug)]
pub enum BenchtabError {
    /// Input file or directory absent
    #[error("Input not found: '{}'", .0.display())]
    NotFound(PathBuf),

    /// Workbook parsed to zero sheets or zero rows
    #[error("No rows found in '{0}'")]
    EmptyInput(String),

    /// Runtime fetch failed: network error or non-success status
    #[error("Loading '{url}' failed: {message}")]
    Load { url: String, message: String },

    // Module errors
    #[error("{0}")]
    SpreadsheetError(#[from] SpreadsheetError),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    GlobError(#[from] glob::GlobError),
}
