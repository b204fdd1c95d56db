//! Error types for the CSV to OpenControl conversion pipeline.
//!
//! - [`CsvError`] - loading and decoding the input export
//! - [`ControlKeyError`] - malformed control identifiers (non-fatal, per row)
//! - [`WriteError`] - creating directories and writing YAML documents
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Loading Errors
// =============================================================================

/// Errors while loading the CSV export.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes could not be decoded to text.
    #[error("Failed to decode input as {0}")]
    Encoding(String),

    /// Malformed CSV record.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// A required header is not present.
    #[error("Missing required column: '{0}'")]
    MissingColumn(String),
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Control Identifier Errors
// =============================================================================

/// Why a control identifier could not yield a control family.
///
/// These never abort a run: the record is still emitted under the
/// configured fallback family and a warning is logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlKeyError {
    /// The control cell was blank.
    #[error("control identifier is empty")]
    Empty,

    /// No `-` separates the family from the control number.
    #[error("control identifier '{0}' has no family delimiter '-'")]
    MissingDelimiter(String),

    /// Nothing precedes the first `-`.
    #[error("control identifier '{0}' has an empty family prefix")]
    EmptyFamily(String),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the OpenControl tree. These abort the run.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input path does not exist.
    #[error("Can't find file: {}", .0.display())]
    InputNotFound(PathBuf),

    /// CSV loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Output error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for output operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
