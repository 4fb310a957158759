//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a trace log
///
/// The two source variants are diagnostics, not failures: the report
/// command hands their message back to the caller instead of aborting.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace file doesn't exist at given path: {}", .0.display())]
    SourceUnavailable(PathBuf),

    #[error("Trace file has no usable content at given path: {}", .0.display())]
    SourceEmpty(PathBuf),

    #[error("Failed to read trace file: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// True for the diagnostics that are reported as a message rather than an error
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, TraceError::SourceUnavailable(_) | TraceError::SourceEmpty(_))
    }
}

/// Errors that can occur during table or JSON output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Missing column '{column}' in table row {row}")]
    MissingColumn { column: String, row: usize },

    #[error("Invalid value '{value}' in column '{column}'")]
    InvalidValue { column: String, value: String },
}
