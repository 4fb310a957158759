//! Output writers for call records and reports.
//!
//! This module handles writing data to disk in various formats:
//! - CSV tables of call and summary records (replace or append)
//! - JSON reports of one page of records

pub mod csv;
pub mod json;
pub mod table;

// Re-export main functions
pub use json::{read_report, to_report, write_report};
pub use table::{
    latest_run, load_records, load_table, persist_table, PersistMode, TableRecord, TableRow,
};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_empty() {
        assert!(validate_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_path(temp_dir.path()).is_err());
    }
}
